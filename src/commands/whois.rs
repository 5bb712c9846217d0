use serenity::{
    all::{CommandInteraction, CommandOptionType, Permissions, RoleId, UserPublicFlags},
    builder::{CreateCommand, CreateCommandOption, CreateEmbed},
};

use crate::{
    common::options::Options,
    models::{
        command::{Command, CommandContext, CommandContextReply},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

// Longer role lists are cut off with an ellipsis
const MAX_LISTED_ROLES: usize = 15;

/// The highest management level a member holds in the server.
pub fn role_level(is_owner: bool, permissions: Permissions) -> Option<&'static str> {
    if is_owner {
        Some("Server Owner")
    } else if permissions.contains(Permissions::ADMINISTRATOR) {
        Some("Administrator")
    } else if permissions.contains(Permissions::MANAGE_MESSAGES) {
        Some("Moderator")
    } else {
        None
    }
}

pub fn flag_names(flags: UserPublicFlags) -> Vec<&'static str> {
    [
        (UserPublicFlags::DISCORD_EMPLOYEE, "Discord Employee"),
        (UserPublicFlags::PARTNERED_SERVER_OWNER, "Discord Partner"),
        (UserPublicFlags::HYPESQUAD_EVENTS, "Hypesquad Events"),
        (UserPublicFlags::BUG_HUNTER_LEVEL_1, "Bug Hunter Level 1"),
        (UserPublicFlags::BUG_HUNTER_LEVEL_2, "Bug Hunter Level 2"),
        (UserPublicFlags::EARLY_SUPPORTER, "Early Supporter"),
        (UserPublicFlags::ACTIVE_DEVELOPER, "Active Developer"),
    ]
    .into_iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .map(|(_, name)| name)
    .collect()
}

pub fn role_list(roles: &[RoleId]) -> String {
    if roles.is_empty() {
        return "None".to_string();
    }

    let mut listed = roles
        .iter()
        .take(MAX_LISTED_ROLES)
        .map(|role| format!("<@&{role}>"))
        .collect::<Vec<_>>()
        .join(", ");
    if roles.len() > MAX_LISTED_ROLES {
        listed.push_str("...");
    }
    listed
}

pub fn user_information(
    user_id: u64,
    display_name: &str,
    joined_at: Option<i64>,
    created_at: i64,
) -> String {
    let joined = match joined_at {
        Some(joined_at) => format!("<t:{joined_at}:F>"),
        None => "Unknown".to_string(),
    };
    format!(
        "**Mention:** <@{user_id}>\n**Nickname:** {display_name}\n\
         **Joined Server Timestamp:** {joined}\n**Created Account Timestamp:** <t:{created_at}:F>"
    )
}

pub struct WhoisCommand;

#[async_trait::async_trait]
impl Command for WhoisCommand {
    fn name(&self) -> &'static str {
        "whois"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("whois")
            .description("Get information about a user")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::User,
                    "user",
                    "The user to look up, defaults to you",
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
        let user = options.get_user("user").unwrap_or_else(|| cmd.user.clone());

        let Ok(member) = ctx.guild_id.member(&ctx.ctx, user.id).await else {
            return Err(ResponseError::Execution(
                "User not found",
                Some(format!("<@{}> is not a member of this server", user.id)),
            ));
        };

        let level = ctx.guild_id.to_guild_cached(&ctx.ctx.cache).and_then(|guild| {
            role_level(
                guild.owner_id == member.user.id,
                guild.member_permissions(&member),
            )
        });
        let flags = flag_names(
            member
                .user
                .public_flags
                .unwrap_or_else(UserPublicFlags::empty),
        );

        ctx.reply(
            cmd,
            Response::new().embed(
                CreateEmbed::new()
                    .title(member.user.name.clone())
                    .thumbnail(member.face())
                    .field(
                        "User Information",
                        user_information(
                            member.user.id.get(),
                            member.display_name(),
                            member.joined_at.map(|joined_at| joined_at.unix_timestamp()),
                            member.user.created_at().unix_timestamp(),
                        ),
                        false,
                    )
                    .field("Server Permissions", level.unwrap_or("None"), false)
                    .field(
                        "User Flags",
                        if flags.is_empty() {
                            "None".to_string()
                        } else {
                            flags.join(", ")
                        },
                        false,
                    )
                    .field("Roles", role_list(&member.roles), false)
                    .color(handler.giveaway_config.embed_color),
            ),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use serenity::all::{Permissions, RoleId, UserPublicFlags};

    use super::{flag_names, role_level, role_list, user_information};

    #[test]
    fn owners_outrank_administrators_and_moderators() {
        assert_eq!(
            role_level(true, Permissions::empty()),
            Some("Server Owner")
        );
        assert_eq!(
            role_level(false, Permissions::ADMINISTRATOR | Permissions::MANAGE_MESSAGES),
            Some("Administrator")
        );
        assert_eq!(
            role_level(false, Permissions::MANAGE_MESSAGES),
            Some("Moderator")
        );
        assert_eq!(role_level(false, Permissions::SEND_MESSAGES), None);
    }

    #[test]
    fn only_notable_flags_are_named() {
        let flags = UserPublicFlags::EARLY_SUPPORTER
            | UserPublicFlags::HOUSE_BRAVERY
            | UserPublicFlags::ACTIVE_DEVELOPER;
        assert_eq!(flag_names(flags), vec!["Early Supporter", "Active Developer"]);
        assert!(flag_names(UserPublicFlags::empty()).is_empty());
    }

    #[test]
    fn role_lists_stop_after_fifteen() {
        assert_eq!(role_list(&[]), "None");
        assert_eq!(role_list(&[RoleId::new(1), RoleId::new(2)]), "<@&1>, <@&2>");

        let roles: Vec<RoleId> = (1..=20).map(RoleId::new).collect();
        let listed = role_list(&roles);
        assert_eq!(listed.matches("<@&").count(), 15);
        assert!(listed.ends_with("<@&15>..."));
    }

    #[test]
    fn missing_join_date_is_unknown() {
        assert_eq!(
            user_information(5, "Sam", None, 1_600_000_000),
            "**Mention:** <@5>\n**Nickname:** Sam\n\
             **Joined Server Timestamp:** Unknown\n**Created Account Timestamp:** <t:1600000000:F>"
        );
    }
}
