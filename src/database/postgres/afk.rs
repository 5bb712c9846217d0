use sqlx::PgPool;
use tracing::{debug, error};

use crate::models::afk::{AfkStatus, DatabaseAfkStatus};

pub async fn get_all_afk(pool: &PgPool) -> Result<Vec<AfkStatus>, sqlx::Error> {
    let statuses = sqlx::query_as::<_, DatabaseAfkStatus>(
        "SELECT guild_id, user_id, reason, since FROM afk",
    )
    .fetch_all(pool)
    .await?;
    debug!("Loaded {} AFK statuses from database", statuses.len());
    Ok(statuses.into_iter().map(AfkStatus::from).collect())
}

pub async fn set_afk(pool: &PgPool, status: &AfkStatus) -> Result<(), sqlx::Error> {
    if let Err(err) = sqlx::query(
        "INSERT INTO afk (guild_id, user_id, reason, since) VALUES ($1, $2, $3, $4) ON CONFLICT (guild_id, user_id) DO UPDATE SET reason = EXCLUDED.reason, since = EXCLUDED.since",
    )
    .bind(status.guild_id as i64)
    .bind(status.user_id as i64)
    .bind(&status.reason)
    .bind(status.since.unix_timestamp())
    .execute(pool)
    .await
    {
        error!(
            "Could not store AFK status for user {} in guild {}. Failed with error: {:?}",
            status.user_id, status.guild_id, err
        );
        return Err(err);
    }
    Ok(())
}

pub async fn clear_afk(pool: &PgPool, guild_id: u64, user_id: u64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM afk WHERE guild_id = $1 AND user_id = $2")
        .bind(guild_id as i64)
        .bind(user_id as i64)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
