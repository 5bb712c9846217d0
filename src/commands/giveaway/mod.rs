use std::str::FromStr;

use serenity::{
    all::{CommandInteraction, CommandOptionType, Permissions},
    builder::{CreateCommand, CreateCommandOption},
};
use strum::{Display, EnumString};

use crate::{
    common::announcer::DiscordAnnouncer,
    models::{
        command::{Command, CommandContext},
        giveaway::{Giveaway, GiveawayError, GiveawayStore},
        handler::Handler,
        response::{ResponseError, ResponseResult},
    },
};

pub mod create;
pub mod list;
pub mod participation;
pub mod reroll;
pub mod roll;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum GiveawaySubcommand {
    Create,
    Roll,
    Reroll,
    List,
}

pub fn announcer(handler: &Handler, ctx: &CommandContext) -> DiscordAnnouncer {
    DiscordAnnouncer::new(ctx.ctx.http.clone(), handler.giveaway_config.embed_color)
}

pub fn parse_message_id(raw: &str) -> Result<u64, GiveawayError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| GiveawayError::NotFound(raw.to_string()))
}

/// Looks up a giveaway, hiding giveaways that belong to other guilds.
pub async fn find_in_guild(
    store: &dyn GiveawayStore,
    message_id: u64,
    guild_id: u64,
) -> Result<Giveaway, GiveawayError> {
    match store.find_one(message_id).await? {
        Some(giveaway) if giveaway.guild_id == guild_id => Ok(giveaway),
        _ => Err(GiveawayError::NotFound(message_id.to_string())),
    }
}

pub fn mentions(users: &[u64]) -> String {
    users
        .iter()
        .map(|user| format!("<@{user}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn message_id_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, "message_id", description).required(true)
}

pub struct GiveawayCommand;

#[async_trait::async_trait]
impl Command for GiveawayCommand {
    fn name(&self) -> &'static str {
        "giveaway"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("giveaway")
            .description("Giveaway commands")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "create",
                    "Start a new giveaway in this channel",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "title",
                        "The prize for the giveaway",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "description",
                        "The description for the giveaway, use \\n for new lines",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "duration",
                        "How long the giveaway runs for, such as 30m, 2d or 1w",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "total_winner",
                        "The number of winners for the giveaway",
                    )
                    .min_int_value(1)
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::User,
                        "host",
                        "The user hosting the giveaway",
                    )
                    .required(true),
                ),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "roll",
                    "Pick the winners of a finished giveaway",
                )
                .add_sub_option(message_id_option("The message ID of the giveaway to roll")),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "reroll",
                    "Pick new winners for a rolled giveaway",
                )
                .add_sub_option(message_id_option("The message ID of the giveaway to reroll")),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "list",
                "List the running giveaways in this server",
            ))
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        for option in &cmd.data.options {
            let Ok(subcommand) = GiveawaySubcommand::from_str(option.name.as_str()) else {
                continue;
            };

            return match subcommand {
                GiveawaySubcommand::Create => create::create(handler, ctx, cmd).await,
                GiveawaySubcommand::Roll => roll::roll(handler, ctx, cmd).await,
                GiveawaySubcommand::Reroll => reroll::reroll(handler, ctx, cmd).await,
                GiveawaySubcommand::List => list::list(handler, ctx, cmd).await,
            };
        }

        Err(ResponseError::Execution(
            "Invalid command",
            Some("You must specify a subcommand to use this command!".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use time::macros::datetime;

    use super::{find_in_guild, mentions, parse_message_id, GiveawaySubcommand};
    use crate::{
        database::memory::MemoryGiveawayStore,
        models::giveaway::{Giveaway, GiveawayError, GiveawayStore},
    };

    #[test]
    fn subcommands_parse_from_option_names() {
        assert_eq!(
            GiveawaySubcommand::from_str("reroll").unwrap(),
            GiveawaySubcommand::Reroll
        );
        assert_eq!(GiveawaySubcommand::Create.to_string(), "create");
        assert!(GiveawaySubcommand::from_str("delete").is_err());
    }

    #[test]
    fn message_ids_tolerate_whitespace() {
        assert_eq!(parse_message_id(" 1234 ").unwrap(), 1234);
        assert!(matches!(
            parse_message_id("https://discord.com"),
            Err(GiveawayError::NotFound(raw)) if raw == "https://discord.com"
        ));
    }

    #[test]
    fn mentions_are_comma_separated() {
        assert_eq!(mentions(&[1, 2]), "<@1>, <@2>");
        assert_eq!(mentions(&[]), "");
    }

    #[tokio::test]
    async fn giveaways_from_other_guilds_are_hidden() {
        let store = MemoryGiveawayStore::default();
        store
            .insert_one(&Giveaway {
                message_id: 5,
                channel_id: 42,
                guild_id: 7,
                title: "Nitro".to_string(),
                description: String::new(),
                end_time: datetime!(2024-08-01 12:00 UTC),
                total_winners: 1,
                host_id: 99,
                participants: vec![],
                winners: vec![],
                rolled_at: None,
                needs_manual_roll: false,
                announced: false,
            })
            .await
            .unwrap();

        assert_eq!(find_in_guild(&store, 5, 7).await.unwrap().message_id, 5);
        assert!(matches!(
            find_in_guild(&store, 5, 8).await,
            Err(GiveawayError::NotFound(raw)) if raw == "5"
        ));
    }
}
