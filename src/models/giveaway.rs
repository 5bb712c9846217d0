use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum GiveawayError {
    #[error("`{0}` is not a valid duration. Please use formats like '2d', '1w', '3h', '45m', '30s'.")]
    InvalidDuration(String),
    #[error("A giveaway needs a title")]
    EmptyTitle,
    #[error("A giveaway needs at least one winner")]
    InvalidWinnerCount,
    #[error("Giveaway `{0}` could not be found")]
    NotFound(String),
    #[error("Giveaway {message_id} is still active, it ends <t:{ends_at}:R>")]
    StillActive { message_id: u64, ends_at: i64 },
    #[error("Giveaway {0} has already been rolled, use reroll to draw new winners")]
    AlreadyRolled(u64),
    #[error("Giveaway {0} has not been rolled yet")]
    NotRolled(u64),
    #[error("Only {entered} participant(s) entered but {required} winner(s) are required")]
    InsufficientParticipants { required: u32, entered: usize },
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
    #[error("Discord error: {0}")]
    Platform(#[from] serenity::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Giveaway {
    pub message_id: u64,
    pub channel_id: u64,
    pub guild_id: u64,
    pub title: String,
    pub description: String,
    pub end_time: OffsetDateTime,
    pub total_winners: u32,
    pub host_id: u64,
    pub participants: Vec<u64>,
    pub winners: Vec<u64>,
    pub rolled_at: Option<OffsetDateTime>,
    pub needs_manual_roll: bool,
    /// Whether the winners of the last roll have been posted.
    pub announced: bool,
}

impl Giveaway {
    /// A giveaway is active until its end time, after which it may be rolled.
    pub fn is_active(&self, now: OffsetDateTime) -> bool {
        now < self.end_time
    }

    /// Closed giveaways have been rolled once and no longer accept entries.
    pub fn is_closed(&self) -> bool {
        self.rolled_at.is_some()
    }

    /// Rolled, but the winner announcement never made it out.
    pub fn awaits_announcement(&self) -> bool {
        self.is_closed() && !self.announced
    }
}

fn from_epoch(epoch: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(epoch).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

impl From<DatabaseGiveaway> for Giveaway {
    fn from(value: DatabaseGiveaway) -> Self {
        Giveaway {
            message_id: value.message_id as u64,
            channel_id: value.channel_id as u64,
            guild_id: value.guild_id as u64,
            title: value.title,
            description: value.description,
            end_time: from_epoch(value.duration_epoch),
            total_winners: value.total_winner as u32,
            host_id: value.host as u64,
            participants: value.participants.into_iter().map(|id| id as u64).collect(),
            winners: value.winners.into_iter().map(|id| id as u64).collect(),
            rolled_at: value.rolled_at.map(from_epoch),
            needs_manual_roll: value.needs_manual_roll,
            announced: value.announced,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DatabaseGiveaway {
    pub message_id: i64,
    pub channel_id: i64,
    pub guild_id: i64,
    pub title: String,
    pub description: String,
    pub duration_epoch: i64,
    pub total_winner: i32,
    pub host: i64,
    pub participants: Vec<i64>,
    pub winners: Vec<i64>,
    pub rolled_at: Option<i64>,
    pub needs_manual_roll: bool,
    pub announced: bool,
}

impl From<Giveaway> for DatabaseGiveaway {
    fn from(value: Giveaway) -> Self {
        DatabaseGiveaway {
            message_id: value.message_id as i64,
            channel_id: value.channel_id as i64,
            guild_id: value.guild_id as i64,
            title: value.title,
            description: value.description,
            duration_epoch: value.end_time.unix_timestamp(),
            total_winner: value.total_winners as i32,
            host: value.host_id as i64,
            participants: value.participants.into_iter().map(|id| id as i64).collect(),
            winners: value.winners.into_iter().map(|id| id as i64).collect(),
            rolled_at: value.rolled_at.map(OffsetDateTime::unix_timestamp),
            needs_manual_roll: value.needs_manual_roll,
            announced: value.announced,
        }
    }
}

/// Persistence for giveaway records, keyed by the announcement message ID.
///
/// Membership and roll state only change through the per-record operations
/// below so that concurrent reactions and rolls on the same giveaway never
/// overwrite each other.
#[async_trait::async_trait]
pub trait GiveawayStore: Send + Sync {
    async fn find_one(&self, message_id: u64) -> Result<Option<Giveaway>, GiveawayError>;

    async fn find_by_guild(&self, guild_id: u64) -> Result<Vec<Giveaway>, GiveawayError>;

    /// Giveaways past their end time that are neither rolled nor waiting on a manual roll.
    async fn find_due(&self, now: OffsetDateTime) -> Result<Vec<Giveaway>, GiveawayError>;

    async fn insert_one(&self, giveaway: &Giveaway) -> Result<(), GiveawayError>;

    /// Returns `true` when the user was not yet a participant of an open giveaway.
    async fn add_participant(&self, message_id: u64, user_id: u64)
        -> Result<bool, GiveawayError>;

    /// Returns `true` when the user was a participant of an open giveaway.
    async fn remove_participant(
        &self,
        message_id: u64,
        user_id: u64,
    ) -> Result<bool, GiveawayError>;

    /// Rolled giveaways whose winners have not been announced yet.
    async fn find_unannounced(&self) -> Result<Vec<Giveaway>, GiveawayError>;

    /// Records the first roll. Returns `false` if the giveaway was already closed.
    async fn close(
        &self,
        message_id: u64,
        winners: &[u64],
        rolled_at: OffsetDateTime,
    ) -> Result<bool, GiveawayError>;

    async fn replace_winners(&self, message_id: u64, winners: &[u64])
        -> Result<(), GiveawayError>;

    async fn mark_announced(&self, message_id: u64) -> Result<(), GiveawayError>;

    async fn flag_manual_roll(&self, message_id: u64) -> Result<(), GiveawayError>;

    async fn count(&self) -> Result<i64, GiveawayError>;
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{DatabaseGiveaway, Giveaway};

    fn giveaway() -> Giveaway {
        Giveaway {
            message_id: 1268849874233725000,
            channel_id: 42,
            guild_id: 7,
            title: "Nitro".to_string(),
            description: "One month".to_string(),
            end_time: datetime!(2024-08-01 12:00 UTC),
            total_winners: 2,
            host_id: 1201129677457215558,
            participants: vec![1, 2, 3],
            winners: vec![],
            rolled_at: None,
            needs_manual_roll: false,
            announced: false,
        }
    }

    #[test]
    fn database_row_keeps_end_time_and_state() {
        let giveaway_row = giveaway();
        let row = DatabaseGiveaway::from(giveaway_row.clone());
        assert_eq!(row.duration_epoch, 1722513600);
        assert_eq!(row.total_winner, 2);
        assert_eq!(row.rolled_at, None);
        assert_eq!(Giveaway::from(row), giveaway_row);
    }

    #[test]
    fn active_until_end_time() {
        let giveaway = giveaway();
        assert!(giveaway.is_active(datetime!(2024-08-01 11:59:59 UTC)));
        assert!(!giveaway.is_active(datetime!(2024-08-01 12:00 UTC)));
        assert!(!giveaway.is_closed());
    }

    #[test]
    fn closed_giveaway_awaits_announcement_until_marked() {
        let mut giveaway = giveaway();
        assert!(!giveaway.awaits_announcement());

        giveaway.rolled_at = Some(datetime!(2024-08-01 12:00 UTC));
        assert!(giveaway.awaits_announcement());

        giveaway.announced = true;
        assert!(!giveaway.awaits_announcement());
    }
}
