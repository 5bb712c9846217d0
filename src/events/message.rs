use serenity::{
    all::Message,
    builder::{CreateAllowedMentions, CreateMessage, EditMember},
    prelude::Context,
};
use tracing::{debug, error};

use crate::{
    database::postgres::afk::clear_afk,
    models::{
        afk::{restored_nickname, AfkStatus},
        handler::Handler,
    },
};

pub fn afk_notice(name: &str, status: &AfkStatus) -> String {
    format!(
        "`{name}` is AFK: {} (since <t:{}:R>)",
        status.reason,
        status.since.unix_timestamp()
    )
}

impl Handler {
    async fn welcome_back(&self, ctx: &Context, message: &Message, status: AfkStatus) {
        if let Err(err) = clear_afk(&self.main_database, status.guild_id, status.user_id).await {
            error!(
                "Could not clear AFK status of user {}. Failed with error: {:?}",
                status.user_id, err
            );
        }

        let nickname = message
            .member
            .as_ref()
            .and_then(|member| member.nick.as_deref())
            .and_then(restored_nickname);
        if let (Some(nickname), Some(guild_id)) = (nickname, message.guild_id) {
            if let Err(err) = guild_id
                .edit_member(
                    &ctx.http,
                    message.author.id,
                    EditMember::new().nickname(nickname),
                )
                .await
            {
                debug!(
                    "Could not remove AFK prefix for user {}: {:?}",
                    message.author.id, err
                );
            }
        }

        if let Err(err) = message
            .channel_id
            .send_message(
                &ctx.http,
                CreateMessage::new()
                    .content(format!(
                        "Welcome back <@{}>, I removed your AFK status.",
                        status.user_id
                    ))
                    .allowed_mentions(CreateAllowedMentions::new().users([message.author.id])),
            )
            .await
        {
            error!("Failed to send welcome back message: {:?}", err);
        }
    }

    pub async fn on_message(&self, ctx: Context, message: Message) {
        let Some(guild_id) = message.guild_id else {
            return;
        };

        if let Some(status) = self
            .afk
            .remove(guild_id.get(), message.author.id.get())
            .await
        {
            self.welcome_back(&ctx, &message, status).await;
        }

        if message.mentions.is_empty() {
            return;
        }

        let mentioned: Vec<u64> = message.mentions.iter().map(|user| user.id.get()).collect();
        let notices: Vec<String> = self
            .afk
            .mentioned(guild_id.get(), &mentioned)
            .await
            .iter()
            .filter(|status| status.user_id != message.author.id.get())
            .filter_map(|status| {
                message
                    .mentions
                    .iter()
                    .find(|user| user.id.get() == status.user_id)
                    .map(|user| afk_notice(&user.name, status))
            })
            .collect();

        if notices.is_empty() {
            return;
        }

        if let Err(err) = message
            .channel_id
            .send_message(
                &ctx.http,
                CreateMessage::new()
                    .content(notices.join("\n"))
                    .reference_message(&message)
                    .allowed_mentions(CreateAllowedMentions::new()),
            )
            .await
        {
            error!("Failed to send AFK notice: {:?}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::afk_notice;
    use crate::models::afk::AfkStatus;

    #[test]
    fn notice_names_the_user_and_reason() {
        let status = AfkStatus {
            guild_id: 1,
            user_id: 10,
            reason: "lunch".to_string(),
            since: datetime!(2024-08-01 12:00 UTC),
        };
        assert_eq!(
            afk_notice("nerd", &status),
            "`nerd` is AFK: lunch (since <t:1722513600:R>)"
        );
    }
}
