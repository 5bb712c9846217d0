use serenity::builder::{CreateAllowedMentions, CreateEmbed};
use tracing::error;

use super::giveaway::GiveawayError;

pub struct Response {
    pub content: Option<String>,
    pub embeds: Option<Vec<CreateEmbed>>,
    pub allowed_mentions: Option<CreateAllowedMentions>,
    pub ephemeral: bool,
}

#[derive(Debug)]
pub enum ResponseError {
    Serenity(serenity::Error),
    Execution(&'static str, Option<String>),
}

pub type ResponseResult = Result<(), ResponseError>;

impl From<GiveawayError> for ResponseError {
    fn from(value: GiveawayError) -> Self {
        let title = match &value {
            GiveawayError::InvalidDuration(_) => "Invalid duration",
            GiveawayError::EmptyTitle | GiveawayError::InvalidWinnerCount => {
                "Invalid giveaway options"
            }
            GiveawayError::NotFound(_) => "Giveaway not found",
            GiveawayError::StillActive { .. } => "Giveaway is still active",
            GiveawayError::AlreadyRolled(_) => "Giveaway has already been rolled",
            GiveawayError::NotRolled(_) => "Giveaway has not been rolled",
            GiveawayError::InsufficientParticipants { .. } => "Not enough participants",
            GiveawayError::Store(err) => {
                error!("Giveaway command failed on the database. Failed with error: {err:?}");
                return ResponseError::Execution(
                    "Something went wrong",
                    Some("Please try again later".to_string()),
                );
            }
            GiveawayError::Platform(err) => {
                error!("Giveaway command failed on Discord. Failed with error: {err:?}");
                return ResponseError::Execution(
                    "Something went wrong",
                    Some("Please try again later".to_string()),
                );
            }
        };
        ResponseError::Execution(title, Some(value.to_string()))
    }
}

impl Response {
    pub fn new() -> Self {
        Response {
            content: None,
            embeds: None,
            allowed_mentions: None,
            ephemeral: false,
        }
    }

    pub fn content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds = Some(vec![embed]);
        self
    }

    pub fn allowed_mentions(mut self, allowed_mentions: CreateAllowedMentions) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}
