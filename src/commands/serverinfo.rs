use serenity::{
    all::{CommandInteraction, Guild, VerificationLevel},
    builder::{CreateCommand, CreateEmbed},
};

use crate::models::{
    command::{Command, CommandContext, CommandContextReply},
    handler::Handler,
    response::{Response, ResponseError, ResponseResult},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSummary {
    pub name: String,
    pub icon_url: Option<String>,
    pub id: u64,
    pub owner_id: u64,
    pub verification_level: &'static str,
    pub boost_tier: u8,
    pub boost_count: u64,
    pub member_count: u64,
    pub role_count: usize,
    pub emoji_count: usize,
    pub channel_count: usize,
}

fn verification_level(level: VerificationLevel) -> &'static str {
    match level {
        VerificationLevel::None => "None",
        VerificationLevel::Low => "Low",
        VerificationLevel::Medium => "Medium",
        VerificationLevel::High => "High",
        VerificationLevel::Higher => "Highest",
        _ => "Unknown",
    }
}

impl ServerSummary {
    pub fn from_guild(guild: &Guild) -> Self {
        ServerSummary {
            name: guild.name.clone(),
            icon_url: guild.icon_url(),
            id: guild.id.get(),
            owner_id: guild.owner_id.get(),
            verification_level: verification_level(guild.verification_level),
            boost_tier: u8::from(guild.premium_tier),
            boost_count: guild.premium_subscription_count.unwrap_or_default(),
            member_count: guild.member_count,
            role_count: guild.roles.len(),
            emoji_count: guild.emojis.len(),
            channel_count: guild.channels.len(),
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "**ID:** {}\n**Owner:** <@{}>\n**Verification Level:** {}\n**Boost Tier:** {}\n\
             **Boost Count:** {}\n**Member Count:** {}\n**Role Count:** {}\n\
             **Emoji Count:** {}\n**Channel Count:** {}",
            self.id,
            self.owner_id,
            self.verification_level,
            self.boost_tier,
            self.boost_count,
            self.member_count,
            self.role_count,
            self.emoji_count,
            self.channel_count
        )
    }
}

pub struct ServerInfoCommand;

#[async_trait::async_trait]
impl Command for ServerInfoCommand {
    fn name(&self) -> &'static str {
        "serverinfo"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("serverinfo")
            .description("Get information about the server")
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        let summary = ctx
            .guild_id
            .to_guild_cached(&ctx.ctx.cache)
            .map(|guild| ServerSummary::from_guild(&guild));
        let Some(summary) = summary else {
            return Err(ResponseError::Execution(
                "Server information is unavailable",
                Some("Please try again in a moment".to_string()),
            ));
        };

        let mut embed = CreateEmbed::new()
            .title(summary.name.clone())
            .field("Server Information", summary.describe(), false)
            .color(handler.giveaway_config.embed_color);
        if let Some(icon_url) = &summary.icon_url {
            embed = embed.thumbnail(icon_url);
        }

        ctx.reply(cmd, Response::new().embed(embed)).await
    }
}
