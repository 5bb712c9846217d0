use std::time::Instant;

use pretty_duration::pretty_duration;
use serenity::{
    all::CommandInteraction,
    builder::{CreateCommand, CreateEmbed},
};

use crate::models::{
    command::{Command, CommandContext, CommandContextReply},
    giveaway::GiveawayStore,
    handler::Handler,
    response::{Response, ResponseResult},
};

pub struct AboutCommand;

#[async_trait::async_trait]
impl Command for AboutCommand {
    fn name(&self) -> &'static str {
        "about"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("about").description("Get information about the bot")
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        let start = Instant::now();
        ctx.reply(cmd, Response::new().content("...".to_string()))
            .await?;
        let latency = start.elapsed();

        let giveaway_count = handler.giveaways.count().await?;

        ctx.reply(
            cmd,
            Response::new().content(String::new()).embed(
                CreateEmbed::new()
                    .title("Cyni Information")
                    .fields(vec![
                        (
                            "Network",
                            format!(
                                "Shard ID {}\nLatency: {}",
                                ctx.ctx.shard_id,
                                pretty_duration(&latency, None)
                            ),
                            true,
                        ),
                        (
                            "Information",
                            format!(
                                "Serving {} guilds\nTracking {giveaway_count} giveaways",
                                ctx.ctx.cache.guild_count()
                            ),
                            true,
                        ),
                        (
                            "Meta",
                            format!(
                                "Version: {}\nUptime: {}",
                                env!("CARGO_PKG_VERSION"),
                                pretty_duration(&handler.start_time.elapsed(), None)
                            ),
                            true,
                        ),
                    ])
                    .color(handler.giveaway_config.embed_color),
            ),
        )
        .await
    }
}
