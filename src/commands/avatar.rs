use std::str::FromStr;

use serenity::{
    all::{CommandInteraction, CommandOptionType},
    builder::{CreateCommand, CreateCommandOption, CreateEmbed},
};
use strum::{Display, EnumString};

use crate::{
    common::options::Options,
    models::{
        command::{Command, CommandContext, CommandContextReply},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AvatarSubcommand {
    User,
    Server,
}

pub fn image_title(owner: &str, subcommand: AvatarSubcommand) -> String {
    match subcommand {
        AvatarSubcommand::User => format!("{owner}'s Avatar"),
        AvatarSubcommand::Server => format!("{owner}'s Icon"),
    }
}

fn image_embed(handler: &Handler, title: String, url: String) -> Response {
    Response::new().embed(
        CreateEmbed::new()
            .title(title)
            .image(url)
            .color(handler.giveaway_config.embed_color),
    )
}

pub struct AvatarCommand;

#[async_trait::async_trait]
impl Command for AvatarCommand {
    fn name(&self) -> &'static str {
        "avatar"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("avatar")
            .description("Show an avatar or the server icon")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "user",
                    "Get a user's avatar",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::User,
                        "user",
                        "The user whose avatar to show, defaults to you",
                    )
                    .required(false),
                ),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "server",
                "Get the server's icon",
            ))
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        let Some(subcommand) = cmd
            .data
            .options
            .iter()
            .find_map(|option| AvatarSubcommand::from_str(option.name.as_str()).ok())
        else {
            return Err(ResponseError::Execution(
                "Invalid command",
                Some("You must specify a subcommand to use this command!".to_string()),
            ));
        };

        let response = match subcommand {
            AvatarSubcommand::User => {
                let options = Options {
                    options: cmd.data.options(),
                };
                let user = options.get_user("user").unwrap_or_else(|| cmd.user.clone());
                image_embed(handler, image_title(&user.name, subcommand), user.face())
            }
            AvatarSubcommand::Server => {
                let icon = ctx
                    .guild_id
                    .to_guild_cached(&ctx.ctx.cache)
                    .map(|guild| (guild.name.clone(), guild.icon_url()));
                match icon {
                    Some((name, Some(url))) => {
                        image_embed(handler, image_title(&name, subcommand), url)
                    }
                    Some((_, None)) => {
                        return Err(ResponseError::Execution(
                            "No server icon",
                            Some("This server does not have an icon".to_string()),
                        ))
                    }
                    None => {
                        return Err(ResponseError::Execution(
                            "Server information is unavailable",
                            Some("Please try again in a moment".to_string()),
                        ))
                    }
                }
            }
        };

        ctx.reply(cmd, response).await
    }
}
