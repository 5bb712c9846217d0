use rand::{rngs::StdRng, Rng, SeedableRng};
use serenity::{all::CommandInteraction, builder::CreateEmbed};
use tracing::info;

use crate::{
    common::options::Options,
    models::{
        announcer::Announcer,
        command::{CommandContext, CommandContextReply},
        giveaway::{GiveawayError, GiveawayStore},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

use super::{
    announcer, find_in_guild, mentions, parse_message_id,
    roll::{announce_winners, draw_winners},
};

/// Draws new winners for a giveaway that has already been rolled.
pub async fn reroll_giveaway<R: Rng + Send>(
    store: &dyn GiveawayStore,
    announcer: &dyn Announcer,
    message_id: &str,
    guild_id: u64,
    rng: &mut R,
) -> Result<Vec<u64>, GiveawayError> {
    let message_id = parse_message_id(message_id)?;
    let giveaway = find_in_guild(store, message_id, guild_id).await?;

    if !giveaway.is_closed() {
        return Err(GiveawayError::NotRolled(giveaway.message_id));
    }

    let winners = draw_winners(&giveaway.participants, giveaway.total_winners, rng)?;
    store.replace_winners(giveaway.message_id, &winners).await?;

    info!(
        "Rerolled giveaway {}, previous winners were {:?}",
        giveaway.message_id, giveaway.winners
    );

    announce_winners(
        announcer,
        &giveaway,
        format!(
            "🎉 The {} giveaway has been rerolled! Congratulations to {}!\nHosted by <@{}>",
            giveaway.title,
            mentions(&winners),
            giveaway.host_id
        ),
        "Rerolled winner(s)",
        &winners,
    )
    .await?;

    Ok(winners)
}

pub async fn reroll(
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

    let winners = reroll_giveaway(
        &handler.giveaways,
        &announcer(handler, ctx),
        &message_id,
        ctx.guild_id.get(),
        &mut StdRng::from_entropy(),
    )
    .await?;

    ctx.reply(
        cmd,
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("Successfully rerolled giveaway")
                    .description(format!("New winner(s): {}", mentions(&winners)))
                    .color(handler.giveaway_config.embed_color),
            )
            .ephemeral(true),
    )
    .await
}
