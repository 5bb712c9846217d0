use serenity::{
    all::{CommandInteraction, CommandOptionType},
    builder::{CreateAllowedMentions, CreateCommand, CreateCommandOption, EditMember},
};
use time::OffsetDateTime;
use tracing::debug;

use crate::{
    common::options::Options,
    database::postgres::afk::set_afk,
    models::{
        afk::{afk_nickname, AfkStatus, DEFAULT_AFK_REASON},
        command::{Command, CommandContext, CommandContextReply},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

pub struct AfkCommand;

#[async_trait::async_trait]
impl Command for AfkCommand {
    fn name(&self) -> &'static str {
        "afk"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("afk")
            .description("Set your status as AFK")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "reason",
                    "Why you are away",
                )
                .required(false),
            )
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        let options = Options {
            options: cmd.data.options(),
        };
        let reason = options
            .get_string("reason")
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty())
            .unwrap_or_else(|| DEFAULT_AFK_REASON.to_string());

        let status = AfkStatus {
            guild_id: ctx.guild_id.get(),
            user_id: cmd.user.id.get(),
            reason,
            since: OffsetDateTime::now_utc(),
        };

        if set_afk(&handler.main_database, &status).await.is_err() {
            return Err(ResponseError::Execution(
                "Could not set your AFK status",
                Some("Please try again later".to_string()),
            ));
        }
        handler.afk.set(status.clone()).await;

        ctx.reply(
            cmd,
            Response::new()
                .content(format!(
                    "`{}` is now AFK. Reason: {}",
                    cmd.user.tag(),
                    status.reason
                ))
                .allowed_mentions(CreateAllowedMentions::new()),
        )
        .await?;

        let display_name = match &cmd.member {
            Some(member) => member.display_name().to_string(),
            None => cmd.user.name.clone(),
        };
        // Members above the bot in the role list cannot be renamed
        if let Err(err) = ctx
            .guild_id
            .edit_member(
                &ctx.ctx.http,
                cmd.user.id,
                EditMember::new().nickname(afk_nickname(&display_name)),
            )
            .await
        {
            debug!("Could not add AFK prefix for user {}: {:?}", cmd.user.id, err);
        }

        Ok(())
    }
}
