use std::{
    sync::{atomic::AtomicBool, Arc},
    time::Instant,
};

use crate::database::postgres::giveaways::PgGiveawayStore;

use super::{afk::AfkCache, config::GiveawayConfig};

#[derive(Clone)]
pub struct Handler {
    pub main_database: sqlx::PgPool,
    pub giveaways: PgGiveawayStore,
    pub afk: Arc<AfkCache>,
    pub giveaway_config: GiveawayConfig,
    pub start_time: Instant,
    pub expiry_task_started: Arc<AtomicBool>,
}
