use serenity::{
    all::CommandInteraction,
    builder::{CreateEmbed, CreateEmbedFooter},
};
use time::OffsetDateTime;

use crate::models::{
    command::{CommandContext, CommandContextReply},
    giveaway::{Giveaway, GiveawayError, GiveawayStore},
    handler::Handler,
    response::{Response, ResponseResult},
};

// Discord rejects embeds with more fields than this
const MAX_EMBED_FIELDS: usize = 25;

pub async fn active_giveaways(
    store: &dyn GiveawayStore,
    guild_id: u64,
    now: OffsetDateTime,
) -> Result<Vec<Giveaway>, GiveawayError> {
    Ok(store
        .find_by_guild(guild_id)
        .await?
        .into_iter()
        .filter(|giveaway| giveaway.is_active(now))
        .collect())
}

pub fn summary_fields(giveaways: &[Giveaway]) -> Vec<(String, String, bool)> {
    giveaways
        .iter()
        .take(MAX_EMBED_FIELDS)
        .map(|giveaway| {
            (
                format!("{} - {}", giveaway.title, giveaway.message_id),
                format!(
                    "Hosted by <@{}>\nEnds at <t:{}:F>",
                    giveaway.host_id,
                    giveaway.end_time.unix_timestamp()
                ),
                false,
            )
        })
        .collect()
}

/// Notes how many giveaways did not fit into the embed.
pub fn overflow_footer(total: usize) -> Option<String> {
    let hidden = total.checked_sub(MAX_EMBED_FIELDS).filter(|hidden| *hidden > 0)?;
    Some(format!("and {hidden} more"))
}

pub async fn list(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let giveaways = active_giveaways(
        &handler.giveaways,
        ctx.guild_id.get(),
        OffsetDateTime::now_utc(),
    )
    .await?;

    if giveaways.is_empty() {
        return ctx
            .reply(
                cmd,
                Response::new().content("No active giveaways.".to_string()),
            )
            .await;
    }

    let mut embed = CreateEmbed::new()
        .title("Active Giveaways")
        .fields(summary_fields(&giveaways))
        .color(handler.giveaway_config.embed_color);
    if let Some(footer) = overflow_footer(giveaways.len()) {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }

    ctx.reply(cmd, Response::new().embed(embed)).await
}

#[cfg(test)]
mod tests {
    use time::{macros::datetime, Duration};

    use super::{active_giveaways, overflow_footer, summary_fields};
    use crate::{
        database::memory::MemoryGiveawayStore,
        models::giveaway::{Giveaway, GiveawayStore},
    };

    fn giveaway(message_id: u64, guild_id: u64, hours_from_noon: i64) -> Giveaway {
        Giveaway {
            message_id,
            channel_id: 42,
            guild_id,
            title: format!("Prize {message_id}"),
            description: String::new(),
            end_time: datetime!(2024-08-01 12:00 UTC) + Duration::hours(hours_from_noon),
            total_winners: 1,
            host_id: 99,
            participants: vec![],
            winners: vec![],
            rolled_at: None,
            needs_manual_roll: false,
            announced: false,
        }
    }

    #[tokio::test]
    async fn lists_only_running_giveaways_of_the_guild() {
        let store = MemoryGiveawayStore::default();
        for giveaway in [
            giveaway(1, 7, 2),
            giveaway(2, 7, -1),
            giveaway(3, 8, 5),
            giveaway(4, 7, 1),
        ] {
            store.insert_one(&giveaway).await.unwrap();
        }

        let active = active_giveaways(&store, 7, datetime!(2024-08-01 12:00 UTC))
            .await
            .unwrap();
        let ids: Vec<u64> = active.iter().map(|giveaway| giveaway.message_id).collect();
        assert_eq!(ids, vec![4, 1]);
    }

    #[tokio::test]
    async fn empty_guild_has_no_active_giveaways() {
        let store = MemoryGiveawayStore::default();
        store.insert_one(&giveaway(2, 7, -1)).await.unwrap();
        assert!(active_giveaways(&store, 7, datetime!(2024-08-01 12:00 UTC))
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn summary_shows_title_id_host_and_end() {
        let fields = summary_fields(&[giveaway(4, 7, 1)]);
        assert_eq!(
            fields,
            vec![(
                "Prize 4 - 4".to_string(),
                "Hosted by <@99>\nEnds at <t:1722517200:F>".to_string(),
                false
            )]
        );
        let many: Vec<Giveaway> = (0..40).map(|id| giveaway(id, 7, 1)).collect();
        assert_eq!(summary_fields(&many).len(), 25);
    }

    #[test]
    fn hidden_giveaways_are_counted_in_the_footer() {
        assert_eq!(overflow_footer(3), None);
        assert_eq!(overflow_footer(25), None);
        assert_eq!(overflow_footer(26), Some("and 1 more".to_string()));
        assert_eq!(overflow_footer(40), Some("and 15 more".to_string()));
    }
}
