use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::{debug, error};

use crate::models::giveaway::{DatabaseGiveaway, Giveaway, GiveawayError, GiveawayStore};

const SELECT_GIVEAWAY: &str = "SELECT message_id, channel_id, guild_id, title, description, duration_epoch, total_winner, host, participants, winners, rolled_at, needs_manual_roll, announced FROM giveaways";

#[derive(Clone)]
pub struct PgGiveawayStore {
    pool: PgPool,
}

impl PgGiveawayStore {
    pub fn new(pool: PgPool) -> Self {
        PgGiveawayStore { pool }
    }
}

fn to_ids(ids: &[u64]) -> Vec<i64> {
    ids.iter().map(|id| *id as i64).collect()
}

#[async_trait::async_trait]
impl GiveawayStore for PgGiveawayStore {
    async fn find_one(&self, message_id: u64) -> Result<Option<Giveaway>, GiveawayError> {
        match sqlx::query_as::<_, DatabaseGiveaway>(&format!(
            "{SELECT_GIVEAWAY} WHERE message_id = $1"
        ))
        .bind(message_id as i64)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(giveaway) => Ok(giveaway.map(Giveaway::from)),
            Err(err) => {
                error!(
                    "Could not get giveaway {} from database. Failed with error: {:?}",
                    message_id, err
                );
                Err(GiveawayError::Store(err))
            }
        }
    }

    async fn find_by_guild(&self, guild_id: u64) -> Result<Vec<Giveaway>, GiveawayError> {
        let giveaways = sqlx::query_as::<_, DatabaseGiveaway>(&format!(
            "{SELECT_GIVEAWAY} WHERE guild_id = $1 ORDER BY duration_epoch"
        ))
        .bind(guild_id as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(giveaways.into_iter().map(Giveaway::from).collect())
    }

    async fn find_due(&self, now: OffsetDateTime) -> Result<Vec<Giveaway>, GiveawayError> {
        let giveaways = sqlx::query_as::<_, DatabaseGiveaway>(&format!(
            "{SELECT_GIVEAWAY} WHERE duration_epoch <= $1 AND rolled_at IS NULL AND needs_manual_roll = false ORDER BY duration_epoch"
        ))
        .bind(now.unix_timestamp())
        .fetch_all(&self.pool)
        .await?;
        debug!("Found {} giveaways due for a roll", giveaways.len());
        Ok(giveaways.into_iter().map(Giveaway::from).collect())
    }

    async fn find_unannounced(&self) -> Result<Vec<Giveaway>, GiveawayError> {
        let giveaways = sqlx::query_as::<_, DatabaseGiveaway>(&format!(
            "{SELECT_GIVEAWAY} WHERE rolled_at IS NOT NULL AND announced = false ORDER BY rolled_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        if !giveaways.is_empty() {
            debug!("Found {} giveaways with unannounced winners", giveaways.len());
        }
        Ok(giveaways.into_iter().map(Giveaway::from).collect())
    }

    async fn insert_one(&self, giveaway: &Giveaway) -> Result<(), GiveawayError> {
        let row = DatabaseGiveaway::from(giveaway.clone());
        if let Err(err) = sqlx::query(
            "INSERT INTO giveaways (message_id, channel_id, guild_id, title, description, duration_epoch, total_winner, host, participants, winners, rolled_at, needs_manual_roll, announced) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(row.message_id)
        .bind(row.channel_id)
        .bind(row.guild_id)
        .bind(row.title)
        .bind(row.description)
        .bind(row.duration_epoch)
        .bind(row.total_winner)
        .bind(row.host)
        .bind(row.participants)
        .bind(row.winners)
        .bind(row.rolled_at)
        .bind(row.needs_manual_roll)
        .bind(row.announced)
        .execute(&self.pool)
        .await
        {
            error!(
                "Could not insert giveaway {} into database. Failed with error: {:?}",
                giveaway.message_id, err
            );
            return Err(GiveawayError::Store(err));
        }
        Ok(())
    }

    async fn add_participant(
        &self,
        message_id: u64,
        user_id: u64,
    ) -> Result<bool, GiveawayError> {
        let result = sqlx::query(
            "UPDATE giveaways SET participants = array_append(participants, $2) WHERE message_id = $1 AND rolled_at IS NULL AND NOT ($2 = ANY(participants))",
        )
        .bind(message_id as i64)
        .bind(user_id as i64)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn remove_participant(
        &self,
        message_id: u64,
        user_id: u64,
    ) -> Result<bool, GiveawayError> {
        let result = sqlx::query(
            "UPDATE giveaways SET participants = array_remove(participants, $2) WHERE message_id = $1 AND rolled_at IS NULL AND $2 = ANY(participants)",
        )
        .bind(message_id as i64)
        .bind(user_id as i64)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn close(
        &self,
        message_id: u64,
        winners: &[u64],
        rolled_at: OffsetDateTime,
    ) -> Result<bool, GiveawayError> {
        let result = sqlx::query(
            "UPDATE giveaways SET winners = $2, rolled_at = $3, needs_manual_roll = false, announced = false WHERE message_id = $1 AND rolled_at IS NULL",
        )
        .bind(message_id as i64)
        .bind(to_ids(winners))
        .bind(rolled_at.unix_timestamp())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn replace_winners(
        &self,
        message_id: u64,
        winners: &[u64],
    ) -> Result<(), GiveawayError> {
        sqlx::query("UPDATE giveaways SET winners = $2 WHERE message_id = $1")
            .bind(message_id as i64)
            .bind(to_ids(winners))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_announced(&self, message_id: u64) -> Result<(), GiveawayError> {
        sqlx::query("UPDATE giveaways SET announced = true WHERE message_id = $1")
            .bind(message_id as i64)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn flag_manual_roll(&self, message_id: u64) -> Result<(), GiveawayError> {
        sqlx::query("UPDATE giveaways SET needs_manual_roll = true WHERE message_id = $1")
            .bind(message_id as i64)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<i64, GiveawayError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM giveaways")
            .fetch_one(&self.pool)
            .await?)
    }
}
