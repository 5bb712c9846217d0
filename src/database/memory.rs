use std::collections::HashMap;

use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::models::giveaway::{Giveaway, GiveawayError, GiveawayStore};

/// Giveaway store kept in a map, with the same per-record semantics as Postgres.
#[derive(Default)]
pub struct MemoryGiveawayStore {
    records: Mutex<HashMap<u64, Giveaway>>,
}

#[async_trait::async_trait]
impl GiveawayStore for MemoryGiveawayStore {
    async fn find_one(&self, message_id: u64) -> Result<Option<Giveaway>, GiveawayError> {
        Ok(self.records.lock().await.get(&message_id).cloned())
    }

    async fn find_by_guild(&self, guild_id: u64) -> Result<Vec<Giveaway>, GiveawayError> {
        let mut giveaways: Vec<Giveaway> = self
            .records
            .lock()
            .await
            .values()
            .filter(|giveaway| giveaway.guild_id == guild_id)
            .cloned()
            .collect();
        giveaways.sort_by_key(|giveaway| giveaway.end_time);
        Ok(giveaways)
    }

    async fn find_due(&self, now: OffsetDateTime) -> Result<Vec<Giveaway>, GiveawayError> {
        let mut giveaways: Vec<Giveaway> = self
            .records
            .lock()
            .await
            .values()
            .filter(|giveaway| {
                giveaway.end_time <= now && !giveaway.is_closed() && !giveaway.needs_manual_roll
            })
            .cloned()
            .collect();
        giveaways.sort_by_key(|giveaway| giveaway.end_time);
        Ok(giveaways)
    }

    async fn find_unannounced(&self) -> Result<Vec<Giveaway>, GiveawayError> {
        let mut giveaways: Vec<Giveaway> = self
            .records
            .lock()
            .await
            .values()
            .filter(|giveaway| giveaway.awaits_announcement())
            .cloned()
            .collect();
        giveaways.sort_by_key(|giveaway| giveaway.rolled_at);
        Ok(giveaways)
    }

    async fn insert_one(&self, giveaway: &Giveaway) -> Result<(), GiveawayError> {
        self.records
            .lock()
            .await
            .insert(giveaway.message_id, giveaway.clone());
        Ok(())
    }

    async fn add_participant(
        &self,
        message_id: u64,
        user_id: u64,
    ) -> Result<bool, GiveawayError> {
        let mut records = self.records.lock().await;
        match records.get_mut(&message_id) {
            Some(giveaway)
                if !giveaway.is_closed() && !giveaway.participants.contains(&user_id) =>
            {
                giveaway.participants.push(user_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_participant(
        &self,
        message_id: u64,
        user_id: u64,
    ) -> Result<bool, GiveawayError> {
        let mut records = self.records.lock().await;
        match records.get_mut(&message_id) {
            Some(giveaway)
                if !giveaway.is_closed() && giveaway.participants.contains(&user_id) =>
            {
                giveaway.participants.retain(|participant| *participant != user_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn close(
        &self,
        message_id: u64,
        winners: &[u64],
        rolled_at: OffsetDateTime,
    ) -> Result<bool, GiveawayError> {
        let mut records = self.records.lock().await;
        match records.get_mut(&message_id) {
            Some(giveaway) if !giveaway.is_closed() => {
                giveaway.winners = winners.to_vec();
                giveaway.rolled_at = Some(rolled_at);
                giveaway.needs_manual_roll = false;
                giveaway.announced = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn replace_winners(
        &self,
        message_id: u64,
        winners: &[u64],
    ) -> Result<(), GiveawayError> {
        if let Some(giveaway) = self.records.lock().await.get_mut(&message_id) {
            giveaway.winners = winners.to_vec();
        }
        Ok(())
    }

    async fn mark_announced(&self, message_id: u64) -> Result<(), GiveawayError> {
        if let Some(giveaway) = self.records.lock().await.get_mut(&message_id) {
            giveaway.announced = true;
        }
        Ok(())
    }

    async fn flag_manual_roll(&self, message_id: u64) -> Result<(), GiveawayError> {
        if let Some(giveaway) = self.records.lock().await.get_mut(&message_id) {
            giveaway.needs_manual_roll = true;
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, GiveawayError> {
        Ok(self.records.lock().await.len() as i64)
    }
}
