use tracing::{debug, error};

use crate::models::{
    announcer::Announcer,
    config::GiveawayConfig,
    giveaway::{GiveawayError, GiveawayStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participation {
    Joined,
    Left,
    /// The membership already matched, or the giveaway is closed.
    Unchanged,
    /// The message is not a giveaway.
    Untracked,
}

async fn unchanged_or_untracked(
    store: &dyn GiveawayStore,
    message_id: u64,
) -> Result<Participation, GiveawayError> {
    Ok(match store.find_one(message_id).await? {
        Some(_) => Participation::Unchanged,
        None => Participation::Untracked,
    })
}

async fn confirm(announcer: &dyn Announcer, config: &GiveawayConfig, channel_id: u64, content: &str) {
    if let Err(err) = announcer
        .notify(channel_id, content, config.notice_lifetime)
        .await
    {
        error!(
            "Could not confirm giveaway participation. Failed with error: {:?}",
            err
        );
    }
}

pub async fn join(
    store: &dyn GiveawayStore,
    announcer: &dyn Announcer,
    config: &GiveawayConfig,
    channel_id: u64,
    message_id: u64,
    user_id: u64,
) -> Result<Participation, GiveawayError> {
    if !store.add_participant(message_id, user_id).await? {
        return unchanged_or_untracked(store, message_id).await;
    }

    debug!("User {} entered giveaway {}", user_id, message_id);
    confirm(
        announcer,
        config,
        channel_id,
        &format!("<@{user_id}> has entered the giveaway!"),
    )
    .await;
    Ok(Participation::Joined)
}

pub async fn leave(
    store: &dyn GiveawayStore,
    announcer: &dyn Announcer,
    config: &GiveawayConfig,
    channel_id: u64,
    message_id: u64,
    user_id: u64,
) -> Result<Participation, GiveawayError> {
    if !store.remove_participant(message_id, user_id).await? {
        return unchanged_or_untracked(store, message_id).await;
    }

    debug!("User {} left giveaway {}", user_id, message_id);
    confirm(
        announcer,
        config,
        channel_id,
        &format!("<@{user_id}> has left the giveaway!"),
    )
    .await;
    Ok(Participation::Left)
}
