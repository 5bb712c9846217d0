use std::collections::HashMap;

use time::OffsetDateTime;
use tokio::sync::RwLock;

pub const AFK_NICKNAME_PREFIX: &str = "[AFK] ";
pub const DEFAULT_AFK_REASON: &str = "No reason provided.";

// Discord nickname limit, counted in characters
const MAX_NICKNAME_LENGTH: usize = 32;

pub fn afk_nickname(display_name: &str) -> String {
    format!("{AFK_NICKNAME_PREFIX}{display_name}")
        .chars()
        .take(MAX_NICKNAME_LENGTH)
        .collect()
}

/// The nickname to restore once the user is back, if the prefix is still there.
pub fn restored_nickname(nickname: &str) -> Option<&str> {
    nickname.strip_prefix(AFK_NICKNAME_PREFIX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfkStatus {
    pub guild_id: u64,
    pub user_id: u64,
    pub reason: String,
    pub since: OffsetDateTime,
}

impl From<DatabaseAfkStatus> for AfkStatus {
    fn from(value: DatabaseAfkStatus) -> Self {
        AfkStatus {
            guild_id: value.guild_id as u64,
            user_id: value.user_id as u64,
            reason: value.reason,
            since: OffsetDateTime::from_unix_timestamp(value.since)
                .unwrap_or(OffsetDateTime::UNIX_EPOCH),
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct DatabaseAfkStatus {
    pub guild_id: i64,
    pub user_id: i64,
    pub reason: String,
    pub since: i64,
}

/// In-process view of who is AFK, keyed by guild and user.
///
/// The `afk` table stays the source of truth; the cache is filled from it at
/// startup and kept in step by the AFK command and the message handler.
#[derive(Debug, Default)]
pub struct AfkCache {
    entries: RwLock<HashMap<(u64, u64), AfkStatus>>,
}

impl AfkCache {
    pub fn new(statuses: Vec<AfkStatus>) -> Self {
        AfkCache {
            entries: RwLock::new(
                statuses
                    .into_iter()
                    .map(|status| ((status.guild_id, status.user_id), status))
                    .collect(),
            ),
        }
    }

    pub async fn set(&self, status: AfkStatus) {
        self.entries
            .write()
            .await
            .insert((status.guild_id, status.user_id), status);
    }

    pub async fn remove(&self, guild_id: u64, user_id: u64) -> Option<AfkStatus> {
        // Read first so regular chatter never waits on the write lock
        if !self.entries.read().await.contains_key(&(guild_id, user_id)) {
            return None;
        }
        self.entries.write().await.remove(&(guild_id, user_id))
    }

    /// Returns the AFK status of every mentioned user that has one, once per user.
    pub async fn mentioned(&self, guild_id: u64, user_ids: &[u64]) -> Vec<AfkStatus> {
        let entries = self.entries.read().await;
        let mut statuses: Vec<AfkStatus> = vec![];
        for user_id in user_ids {
            if statuses.iter().any(|status| status.user_id == *user_id) {
                continue;
            }
            if let Some(status) = entries.get(&(guild_id, *user_id)) {
                statuses.push(status.clone());
            }
        }
        statuses
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{afk_nickname, restored_nickname, AfkCache, AfkStatus};

    fn status(guild_id: u64, user_id: u64, reason: &str) -> AfkStatus {
        AfkStatus {
            guild_id,
            user_id,
            reason: reason.to_string(),
            since: datetime!(2024-08-01 12:00 UTC),
        }
    }

    #[tokio::test]
    async fn loads_statuses_from_store() {
        let cache = AfkCache::new(vec![status(1, 10, "lunch"), status(2, 10, "sleep")]);
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.mentioned(1, &[10]).await[0].reason, "lunch");
        assert_eq!(cache.mentioned(2, &[10]).await[0].reason, "sleep");
    }

    #[tokio::test]
    async fn set_overwrites_and_remove_clears() {
        let cache = AfkCache::default();
        cache.set(status(1, 10, "lunch")).await;
        cache.set(status(1, 10, "meeting")).await;
        assert_eq!(cache.mentioned(1, &[10]).await[0].reason, "meeting");

        assert_eq!(cache.remove(1, 10).await.unwrap().reason, "meeting");
        assert_eq!(cache.remove(1, 10).await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn mentioned_only_returns_afk_users_in_guild() {
        let cache = AfkCache::new(vec![status(1, 10, "lunch"), status(2, 20, "sleep")]);
        let statuses = cache.mentioned(1, &[10, 20, 30, 10]).await;
        assert_eq!(statuses, vec![status(1, 10, "lunch")]);
    }

    #[test]
    fn nickname_prefix_is_added_and_stripped() {
        assert_eq!(afk_nickname("Nerd"), "[AFK] Nerd");
        assert_eq!(restored_nickname("[AFK] Nerd"), Some("Nerd"));
        assert_eq!(restored_nickname("Nerd"), None);

        let long = afk_nickname(&"é".repeat(40));
        assert_eq!(long.chars().count(), 32);
        assert!(long.starts_with("[AFK] "));
    }
}
