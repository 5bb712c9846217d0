use serenity::{
    all::{Reaction, ReactionType, User},
    prelude::Context,
};
use tracing::{debug, error};

use crate::{
    commands::giveaway::participation::{join, leave, Participation},
    common::announcer::DiscordAnnouncer,
    models::handler::Handler,
};

/// Bots never take part in giveaways.
fn entrant_id(user: &User) -> Option<u64> {
    (!user.bot).then(|| user.id.get())
}

impl Handler {
    /// Resolves the reacting user when the reaction is a giveaway entry.
    async fn entrant(&self, ctx: &Context, reaction: &Reaction) -> Option<u64> {
        reaction.guild_id?;

        match &reaction.emoji {
            ReactionType::Unicode(emoji) if *emoji == self.giveaway_config.entry_emoji => {}
            _ => return None,
        }

        // Guild reactions carry the member, so the HTTP lookup is only a fallback
        if let Some(member) = &reaction.member {
            return entrant_id(&member.user);
        }

        match reaction.user(ctx).await {
            Ok(user) => entrant_id(&user),
            Err(err) => {
                error!(
                    "Could not resolve user of reaction on message {}. Failed with error: {:?}",
                    reaction.message_id, err
                );
                None
            }
        }
    }

    pub async fn on_reaction_add(&self, ctx: Context, reaction: Reaction) {
        let start = std::time::Instant::now();
        let Some(user_id) = self.entrant(&ctx, &reaction).await else {
            return;
        };

        let announcer = DiscordAnnouncer::new(ctx.http.clone(), self.giveaway_config.embed_color);
        match join(
            &self.giveaways,
            &announcer,
            &self.giveaway_config,
            reaction.channel_id.get(),
            reaction.message_id.get(),
            user_id,
        )
        .await
        {
            Ok(Participation::Untracked) => {}
            Ok(participation) => debug!(
                "Handled giveaway entry in {:?}: {:?}",
                start.elapsed(),
                participation
            ),
            Err(err) => error!(
                "Could not enter user {} into giveaway {}. Failed with error: {:?}",
                user_id, reaction.message_id, err
            ),
        }
    }

    pub async fn on_reaction_remove(&self, ctx: Context, reaction: Reaction) {
        let start = std::time::Instant::now();
        let Some(user_id) = self.entrant(&ctx, &reaction).await else {
            return;
        };

        let announcer = DiscordAnnouncer::new(ctx.http.clone(), self.giveaway_config.embed_color);
        match leave(
            &self.giveaways,
            &announcer,
            &self.giveaway_config,
            reaction.channel_id.get(),
            reaction.message_id.get(),
            user_id,
        )
        .await
        {
            Ok(Participation::Untracked) => {}
            Ok(participation) => debug!(
                "Handled giveaway exit in {:?}: {:?}",
                start.elapsed(),
                participation
            ),
            Err(err) => error!(
                "Could not remove user {} from giveaway {}. Failed with error: {:?}",
                user_id, reaction.message_id, err
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serenity::all::{Member, UserId};

    use super::entrant_id;

    #[test]
    fn members_enter_unless_they_are_bots() {
        let mut member = Member::default();
        member.user.id = UserId::new(501);
        assert_eq!(entrant_id(&member.user), Some(501));

        member.user.bot = true;
        assert_eq!(entrant_id(&member.user), None);
    }
}
