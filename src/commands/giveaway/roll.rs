use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serenity::{all::CommandInteraction, builder::CreateEmbed};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    common::options::Options,
    models::{
        announcer::Announcer,
        command::{CommandContext, CommandContextReply},
        giveaway::{Giveaway, GiveawayError, GiveawayStore},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

use super::{announcer, find_in_guild, mentions, parse_message_id};

/// Draws `count` distinct participants, each equally likely.
pub fn draw_winners<R: Rng + ?Sized>(
    participants: &[u64],
    count: u32,
    rng: &mut R,
) -> Result<Vec<u64>, GiveawayError> {
    if participants.len() < count as usize {
        return Err(GiveawayError::InsufficientParticipants {
            required: count,
            entered: participants.len(),
        });
    }
    Ok(participants
        .choose_multiple(rng, count as usize)
        .copied()
        .collect())
}

/// Sends the winner message and appends a winner line to the announcement.
pub async fn announce_winners(
    announcer: &dyn Announcer,
    giveaway: &Giveaway,
    message: String,
    label: &str,
    winners: &[u64],
) -> Result<(), GiveawayError> {
    announcer.send(giveaway.channel_id, &message).await?;

    let mut announcement = announcer
        .fetch(giveaway.channel_id, giveaway.message_id)
        .await?;
    announcement
        .description
        .push_str(&format!("\n\n{label}: {}", mentions(winners)));
    announcer
        .edit(giveaway.channel_id, giveaway.message_id, &announcement)
        .await
}

/// Posts the winners of a closed giveaway and records that they were posted.
pub async fn announce_roll(
    store: &dyn GiveawayStore,
    announcer: &dyn Announcer,
    giveaway: &Giveaway,
    winners: &[u64],
) -> Result<(), GiveawayError> {
    announce_winners(
        announcer,
        giveaway,
        format!(
            "🎉 Congratulations to {} for winning the {} giveaway!\nHosted by <@{}>",
            mentions(winners),
            giveaway.title,
            giveaway.host_id
        ),
        "Winner(s)",
        winners,
    )
    .await?;
    store.mark_announced(giveaway.message_id).await
}

/// Rolls an expired giveaway that has not been rolled before.
///
/// A giveaway that was rolled but whose announcement failed gets its stored
/// winners announced again instead.
pub async fn roll_record<R: Rng + Send>(
    store: &dyn GiveawayStore,
    announcer: &dyn Announcer,
    giveaway: &Giveaway,
    now: OffsetDateTime,
    rng: &mut R,
) -> Result<Vec<u64>, GiveawayError> {
    if giveaway.is_active(now) {
        return Err(GiveawayError::StillActive {
            message_id: giveaway.message_id,
            ends_at: giveaway.end_time.unix_timestamp(),
        });
    }
    if giveaway.awaits_announcement() {
        info!(
            "Announcing stored winners of giveaway {}",
            giveaway.message_id
        );
        announce_roll(store, announcer, giveaway, &giveaway.winners).await?;
        return Ok(giveaway.winners.clone());
    }
    if giveaway.is_closed() {
        return Err(GiveawayError::AlreadyRolled(giveaway.message_id));
    }

    let winners = draw_winners(&giveaway.participants, giveaway.total_winners, rng)?;

    if !store.close(giveaway.message_id, &winners, now).await? {
        warn!(
            "Giveaway {} was rolled by someone else first",
            giveaway.message_id
        );
        return Err(GiveawayError::AlreadyRolled(giveaway.message_id));
    }

    info!(
        "Rolled giveaway {} with {} participants",
        giveaway.message_id,
        giveaway.participants.len()
    );

    announce_roll(store, announcer, giveaway, &winners).await?;
    Ok(winners)
}

pub async fn roll_giveaway<R: Rng + Send>(
    store: &dyn GiveawayStore,
    announcer: &dyn Announcer,
    message_id: &str,
    guild_id: u64,
    now: OffsetDateTime,
    rng: &mut R,
) -> Result<Vec<u64>, GiveawayError> {
    let message_id = parse_message_id(message_id)?;
    let giveaway = find_in_guild(store, message_id, guild_id).await?;
    roll_record(store, announcer, &giveaway, now, rng).await
}

pub async fn roll(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(message_id) = options.get_string("message_id") else {
        return Err(ResponseError::Execution(
            "Could not get giveaway ID",
            Some("Please use the message ID for the giveaway ID".to_string()),
        ));
    };

    let winners = roll_giveaway(
        &handler.giveaways,
        &announcer(handler, ctx),
        &message_id,
        ctx.guild_id.get(),
        OffsetDateTime::now_utc(),
        &mut StdRng::from_entropy(),
    )
    .await?;

    ctx.reply(
        cmd,
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("Successfully rolled giveaway")
                    .description(format!("Winner(s): {}", mentions(&winners)))
                    .color(handler.giveaway_config.embed_color),
            )
            .ephemeral(true),
    )
    .await
}
