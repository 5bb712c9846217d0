use std::{sync::Arc, time::Duration};

use serenity::{
    all::CommandInteraction,
    builder::{CreateCommand, CreateEmbed},
    gateway::ShardManager,
    prelude::TypeMapKey,
};

use crate::models::{
    command::{Command, CommandContext, CommandContextReply},
    handler::Handler,
    response::{Response, ResponseError, ResponseResult},
};

pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

fn millis(latency: Option<Duration>) -> String {
    match latency {
        Some(latency) => format!("{}ms", latency.as_millis()),
        None => "unknown".to_string(),
    }
}

/// Renders shard latencies. Shards that have not heartbeated yet are left out of the average.
pub fn latency_report(shards: &[(u32, Option<Duration>)], guild_shard: u32) -> String {
    let mut shards = shards.to_vec();
    shards.sort_by_key(|(id, _)| *id);

    let known: Vec<Duration> = shards.iter().filter_map(|(_, latency)| *latency).collect();
    let average = u32::try_from(known.len())
        .ok()
        .filter(|count| *count > 0)
        .map(|count| known.iter().sum::<Duration>() / count);

    let per_shard = shards
        .iter()
        .map(|(id, latency)| format!("Shard {id}: {}", millis(*latency)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Average Latency: {}\nShard Latency:\n{per_shard}\nGuild Shard ID: {guild_shard}",
        millis(average)
    )
}

pub struct PingCommand;

#[async_trait::async_trait]
impl Command for PingCommand {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("ping").description("Get the bot's latency")
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        let shard_manager = ctx
            .ctx
            .data
            .read()
            .await
            .get::<ShardManagerContainer>()
            .cloned();
        let Some(shard_manager) = shard_manager else {
            return Err(ResponseError::Execution(
                "Could not get shard information",
                Some("Please try again later".to_string()),
            ));
        };

        let shards: Vec<(u32, Option<Duration>)> = shard_manager
            .runners
            .lock()
            .await
            .iter()
            .map(|(id, runner)| (id.0, runner.latency))
            .collect();

        ctx.reply(
            cmd,
            Response::new().embed(
                CreateEmbed::new()
                    .title("Pong!")
                    .description(latency_report(&shards, ctx.ctx.shard_id.0))
                    .color(handler.giveaway_config.embed_color),
            ),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::latency_report;

    #[test]
    fn reports_every_shard_in_order() {
        let report = latency_report(
            &[
                (1, Some(Duration::from_millis(60))),
                (0, Some(Duration::from_millis(40))),
            ],
            1,
        );
        assert_eq!(
            report,
            "Average Latency: 50ms\nShard Latency:\nShard 0: 40ms\nShard 1: 60ms\nGuild Shard ID: 1"
        );
    }

    #[test]
    fn shards_without_heartbeat_are_unknown() {
        assert_eq!(
            latency_report(&[(0, None)], 0),
            "Average Latency: unknown\nShard Latency:\nShard 0: unknown\nGuild Shard ID: 0"
        );
        assert!(latency_report(&[(0, None), (1, Some(Duration::from_millis(30)))], 0)
            .starts_with("Average Latency: 30ms\n"));
    }
}
