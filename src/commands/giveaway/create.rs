use serenity::{all::CommandInteraction, builder::CreateEmbed};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    common::{duration::end_time, options::Options},
    models::{
        announcer::{Announcement, Announcer},
        command::{CommandContext, CommandContextReply},
        config::GiveawayConfig,
        giveaway::{Giveaway, GiveawayError, GiveawayStore},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

use super::announcer;

pub struct NewGiveaway {
    pub guild_id: u64,
    pub channel_id: u64,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub total_winners: i64,
    pub host_id: u64,
}

/// Turns literal `\n` sequences typed into a slash command into line breaks.
pub fn format_description(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

pub fn announcement(giveaway: &Giveaway) -> Announcement {
    Announcement {
        title: format!("🎉 {}", giveaway.title),
        description: format!(
            "{}\n\nEnds At: <t:{}:F>\nTotal Winner: {}\nHost: <@{}>",
            giveaway.description,
            giveaway.end_time.unix_timestamp(),
            giveaway.total_winners,
            giveaway.host_id
        ),
        footer: None,
    }
}

pub async fn create_giveaway(
    store: &dyn GiveawayStore,
    announcer: &dyn Announcer,
    config: &GiveawayConfig,
    request: NewGiveaway,
    now: OffsetDateTime,
) -> Result<Giveaway, GiveawayError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(GiveawayError::EmptyTitle);
    }

    let Some(total_winners) = u32::try_from(request.total_winners)
        .ok()
        .filter(|winners| *winners >= 1)
    else {
        return Err(GiveawayError::InvalidWinnerCount);
    };

    let end_time = end_time(&request.duration, now)?;

    let mut giveaway = Giveaway {
        message_id: 0,
        channel_id: request.channel_id,
        guild_id: request.guild_id,
        title: title.to_string(),
        description: format_description(&request.description),
        end_time,
        total_winners,
        host_id: request.host_id,
        participants: vec![],
        winners: vec![],
        rolled_at: None,
        needs_manual_roll: false,
        announced: false,
    };

    let mut announcement = announcement(&giveaway);
    giveaway.message_id = announcer.publish(giveaway.channel_id, &announcement).await?;

    // Reactions can arrive as soon as the message exists, so track it before anything else
    if let Err(err) = store.insert_one(&giveaway).await {
        if let Err(delete_err) = announcer
            .delete(giveaway.channel_id, giveaway.message_id)
            .await
        {
            warn!(
                "Failed to delete untracked giveaway message {}. Failed with error: {:?}",
                giveaway.message_id, delete_err
            );
        }
        return Err(err);
    }

    announcement.footer = Some(format!("Giveaway ID: {}", giveaway.message_id));
    announcer
        .edit(giveaway.channel_id, giveaway.message_id, &announcement)
        .await?;
    announcer
        .add_reaction(giveaway.channel_id, giveaway.message_id, &config.entry_emoji)
        .await?;

    info!(
        "Created giveaway {} in guild {} ending at {}",
        giveaway.message_id, giveaway.guild_id, giveaway.end_time
    );
    Ok(giveaway)
}

pub async fn create(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(title) = options.get_string("title") else {
        return Err(ResponseError::Execution(
            "Could not get giveaway title",
            Some("Please provide a title for the giveaway".to_string()),
        ));
    };
    let Some(duration) = options.get_string("duration") else {
        return Err(ResponseError::Execution(
            "Could not get giveaway duration",
            Some("Please provide a duration such as `2d` or `45m`".to_string()),
        ));
    };
    let Some(total_winners) = options.get_integer("total_winner") else {
        return Err(ResponseError::Execution(
            "Could not get winner count",
            Some("Please provide the number of winners".to_string()),
        ));
    };
    let Some(host) = options.get_user("host") else {
        return Err(ResponseError::Execution(
            "Could not get giveaway host",
            Some("Please provide the host of the giveaway".to_string()),
        ));
    };

    let giveaway = create_giveaway(
        &handler.giveaways,
        &announcer(handler, ctx),
        &handler.giveaway_config,
        NewGiveaway {
            guild_id: ctx.guild_id.get(),
            channel_id: cmd.channel_id.get(),
            title,
            description: options.get_string("description").unwrap_or_default(),
            duration,
            total_winners,
            host_id: host.id.get(),
        },
        OffsetDateTime::now_utc(),
    )
    .await?;

    ctx.reply(
        cmd,
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("Giveaway created")
                    .description(format!(
                        "Giveaway ID: `{}`\nEnds <t:{}:R>",
                        giveaway.message_id,
                        giveaway.end_time.unix_timestamp()
                    ))
                    .color(handler.giveaway_config.embed_color),
            )
            .ephemeral(true),
    )
    .await
}
