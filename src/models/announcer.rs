use std::time::Duration;

use super::giveaway::GiveawayError;

/// The visible part of a giveaway announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub description: String,
    pub footer: Option<String>,
}

/// The messaging operations the giveaway commands need from the chat platform.
#[async_trait::async_trait]
pub trait Announcer: Send + Sync {
    /// Publishes an announcement and returns the ID of the created message.
    async fn publish(
        &self,
        channel_id: u64,
        announcement: &Announcement,
    ) -> Result<u64, GiveawayError>;

    async fn fetch(&self, channel_id: u64, message_id: u64)
        -> Result<Announcement, GiveawayError>;

    async fn edit(
        &self,
        channel_id: u64,
        message_id: u64,
        announcement: &Announcement,
    ) -> Result<(), GiveawayError>;

    async fn delete(&self, channel_id: u64, message_id: u64) -> Result<(), GiveawayError>;

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), GiveawayError>;

    async fn send(&self, channel_id: u64, content: &str) -> Result<(), GiveawayError>;

    /// Sends a message that removes itself after `lifetime`.
    async fn notify(
        &self,
        channel_id: u64,
        content: &str,
        lifetime: Duration,
    ) -> Result<(), GiveawayError>;
}
