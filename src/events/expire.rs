use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serenity::http::Http;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::{
    commands::giveaway::roll::{announce_roll, roll_record},
    common::announcer::DiscordAnnouncer,
    models::{
        announcer::Announcer,
        config::GiveawayConfig,
        giveaway::{Giveaway, GiveawayError, GiveawayStore},
        handler::Handler,
    },
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExpirySummary {
    pub announced: usize,
    pub rolled: usize,
    pub flagged: usize,
    pub failed: usize,
}

async fn flag_for_manual_roll(
    store: &dyn GiveawayStore,
    announcer: &dyn Announcer,
    giveaway: &Giveaway,
    reason: &str,
) -> Result<(), GiveawayError> {
    store.flag_manual_roll(giveaway.message_id).await?;
    announcer
        .send(
            giveaway.channel_id,
            &format!(
                "The {} giveaway has ended. {reason} A manager can roll it with `/giveaway roll {}`.",
                giveaway.title, giveaway.message_id
            ),
        )
        .await
}

/// Runs one pass over every giveaway whose end time has passed.
pub async fn expire_due<R: Rng + Send>(
    store: &dyn GiveawayStore,
    announcer: &dyn Announcer,
    config: &GiveawayConfig,
    now: OffsetDateTime,
    rng: &mut R,
) -> Result<ExpirySummary, GiveawayError> {
    let mut summary = ExpirySummary::default();

    for giveaway in store.find_unannounced().await? {
        match announce_roll(store, announcer, &giveaway, &giveaway.winners).await {
            Ok(()) => {
                info!(
                    "Announced the winners of giveaway {} after an earlier failure",
                    giveaway.message_id
                );
                summary.announced += 1;
            }
            Err(err) => {
                error!(
                    "Failed to announce the winners of giveaway {}. Failed with error: {:?}",
                    giveaway.message_id, err
                );
                summary.failed += 1;
            }
        }
    }

    for giveaway in store.find_due(now).await? {
        debug!(
            "Expiring giveaway {} from guild {}",
            giveaway.message_id, giveaway.guild_id
        );

        let flagged = if config.auto_roll {
            match roll_record(store, announcer, &giveaway, now, rng).await {
                Ok(winners) => {
                    info!(
                        "Automatically rolled giveaway {} with winners {:?}",
                        giveaway.message_id, winners
                    );
                    summary.rolled += 1;
                    continue;
                }
                Err(GiveawayError::AlreadyRolled(_)) => continue,
                Err(err @ GiveawayError::InsufficientParticipants { .. }) => {
                    warn!("Could not roll giveaway {}: {}", giveaway.message_id, err);
                    flag_for_manual_roll(store, announcer, &giveaway, &format!("{err}.")).await
                }
                Err(err) => {
                    error!(
                        "Failed to roll giveaway {}. Failed with error: {:?}",
                        giveaway.message_id, err
                    );
                    summary.failed += 1;
                    continue;
                }
            }
        } else {
            flag_for_manual_roll(store, announcer, &giveaway, "It is waiting to be rolled.").await
        };

        match flagged {
            Ok(()) => summary.flagged += 1,
            Err(err) => {
                error!(
                    "Failed to flag giveaway {} for a manual roll. Failed with error: {:?}",
                    giveaway.message_id, err
                );
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

pub async fn expire_giveaways(handler: Handler, http: Arc<Http>) {
    let announcer = DiscordAnnouncer::new(http, handler.giveaway_config.embed_color);
    let mut rng = StdRng::from_entropy();

    loop {
        let start = std::time::Instant::now();
        match expire_due(
            &handler.giveaways,
            &announcer,
            &handler.giveaway_config,
            OffsetDateTime::now_utc(),
            &mut rng,
        )
        .await
        {
            Ok(summary) => debug!(
                "Finished expiring giveaways in {}ms: {:?}",
                start.elapsed().as_millis(),
                summary
            ),
            Err(err) => error!("Failed to fetch due giveaways: {:?}", err),
        }
        tokio::time::sleep(handler.giveaway_config.check_interval).await;
    }
}
