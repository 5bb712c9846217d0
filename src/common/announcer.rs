use std::{sync::Arc, time::Duration};

use serenity::{
    all::{ChannelId, MessageId, ReactionType},
    builder::{CreateAllowedMentions, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage},
    http::Http,
};
use tracing::{debug, error};

use crate::models::{
    announcer::{Announcement, Announcer},
    giveaway::GiveawayError,
};

/// Posts giveaway announcements as embeds through the Discord REST API.
#[derive(Clone)]
pub struct DiscordAnnouncer {
    http: Arc<Http>,
    color: u32,
}

impl DiscordAnnouncer {
    pub fn new(http: Arc<Http>, color: u32) -> Self {
        DiscordAnnouncer { http, color }
    }

    fn embed(&self, announcement: &Announcement) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .title(&announcement.title)
            .description(&announcement.description)
            .color(self.color);
        if let Some(footer) = &announcement.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer));
        }
        embed
    }
}

#[async_trait::async_trait]
impl Announcer for DiscordAnnouncer {
    async fn publish(
        &self,
        channel_id: u64,
        announcement: &Announcement,
    ) -> Result<u64, GiveawayError> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().embed(self.embed(announcement)))
            .await?;
        Ok(message.id.get())
    }

    async fn fetch(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Announcement, GiveawayError> {
        let message = self
            .http
            .get_message(ChannelId::new(channel_id), MessageId::new(message_id))
            .await?;

        let Some(embed) = message.embeds.into_iter().next() else {
            return Ok(Announcement {
                title: String::new(),
                description: message.content,
                footer: None,
            });
        };

        Ok(Announcement {
            title: embed.title.unwrap_or_default(),
            description: embed.description.unwrap_or_default(),
            footer: embed.footer.map(|footer| footer.text),
        })
    }

    async fn edit(
        &self,
        channel_id: u64,
        message_id: u64,
        announcement: &Announcement,
    ) -> Result<(), GiveawayError> {
        ChannelId::new(channel_id)
            .edit_message(
                &self.http,
                MessageId::new(message_id),
                EditMessage::new().embed(self.embed(announcement)),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, channel_id: u64, message_id: u64) -> Result<(), GiveawayError> {
        ChannelId::new(channel_id)
            .delete_message(&self.http, MessageId::new(message_id))
            .await?;
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), GiveawayError> {
        ChannelId::new(channel_id)
            .create_reaction(
                &self.http,
                MessageId::new(message_id),
                ReactionType::Unicode(emoji.to_string()),
            )
            .await?;
        Ok(())
    }

    async fn send(&self, channel_id: u64, content: &str) -> Result<(), GiveawayError> {
        ChannelId::new(channel_id)
            .send_message(
                &self.http,
                CreateMessage::new()
                    .content(content)
                    .allowed_mentions(CreateAllowedMentions::new().all_users(true)),
            )
            .await?;
        Ok(())
    }

    async fn notify(
        &self,
        channel_id: u64,
        content: &str,
        lifetime: Duration,
    ) -> Result<(), GiveawayError> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().content(content))
            .await?;

        let http = self.http.clone();
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            match message.delete(&http).await {
                Ok(()) => debug!("Removed notice {} after {:?}", message.id, lifetime),
                Err(err) => error!(
                    "Could not remove notice {}. Failed with error: {:?}",
                    message.id, err
                ),
            }
        });
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicU64, AtomicUsize, Ordering},
            Mutex,
        },
        time::Duration,
    };

    use crate::models::{
        announcer::{Announcement, Announcer},
        giveaway::GiveawayError,
    };

    /// Keeps every announcement and message in memory so tests can inspect them.
    #[derive(Default)]
    pub struct RecordingAnnouncer {
        next_id: AtomicU64,
        pub announcements: Mutex<HashMap<u64, (u64, Announcement)>>,
        pub reactions: Mutex<Vec<(u64, String)>>,
        pub sent: Mutex<Vec<(u64, String)>>,
        pub notices: Mutex<Vec<(u64, String)>>,
        /// The next this many `send` calls fail as if Discord were unreachable.
        pub failing_sends: AtomicUsize,
    }

    impl RecordingAnnouncer {
        pub fn announcement(&self, message_id: u64) -> Announcement {
            self.announcements.lock().unwrap()[&message_id].1.clone()
        }

        pub fn sent(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(_, content)| content.clone())
                .collect()
        }

        pub fn notices(&self) -> Vec<String> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .map(|(_, content)| content.clone())
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl Announcer for RecordingAnnouncer {
        async fn publish(
            &self,
            channel_id: u64,
            announcement: &Announcement,
        ) -> Result<u64, GiveawayError> {
            let message_id = 1_000 + self.next_id.fetch_add(1, Ordering::SeqCst);
            self.announcements
                .lock()
                .unwrap()
                .insert(message_id, (channel_id, announcement.clone()));
            Ok(message_id)
        }

        async fn fetch(
            &self,
            _channel_id: u64,
            message_id: u64,
        ) -> Result<Announcement, GiveawayError> {
            self.announcements
                .lock()
                .unwrap()
                .get(&message_id)
                .map(|(_, announcement)| announcement.clone())
                .ok_or(GiveawayError::NotFound(message_id.to_string()))
        }

        async fn edit(
            &self,
            channel_id: u64,
            message_id: u64,
            announcement: &Announcement,
        ) -> Result<(), GiveawayError> {
            self.announcements
                .lock()
                .unwrap()
                .insert(message_id, (channel_id, announcement.clone()));
            Ok(())
        }

        async fn delete(&self, _channel_id: u64, message_id: u64) -> Result<(), GiveawayError> {
            self.announcements.lock().unwrap().remove(&message_id);
            Ok(())
        }

        async fn add_reaction(
            &self,
            _channel_id: u64,
            message_id: u64,
            emoji: &str,
        ) -> Result<(), GiveawayError> {
            self.reactions
                .lock()
                .unwrap()
                .push((message_id, emoji.to_string()));
            Ok(())
        }

        async fn send(&self, channel_id: u64, content: &str) -> Result<(), GiveawayError> {
            let failing = self
                .failing_sends
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
            if failing.is_ok() {
                return Err(GiveawayError::Platform(serenity::Error::Other(
                    "send is unavailable",
                )));
            }
            self.sent
                .lock()
                .unwrap()
                .push((channel_id, content.to_string()));
            Ok(())
        }

        async fn notify(
            &self,
            channel_id: u64,
            content: &str,
            _lifetime: Duration,
        ) -> Result<(), GiveawayError> {
            self.notices
                .lock()
                .unwrap()
                .push((channel_id, content.to_string()));
            Ok(())
        }
    }
}
