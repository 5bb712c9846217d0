use std::sync::atomic::Ordering;

use serenity::{
    all::{CommandInteraction, Message},
    builder::{
        CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
        EditInteractionResponse,
    },
    http::Http,
};
use tracing::{debug, error};

use crate::models::{
    command::{CommandContext, CommandContextReply, FailedCommandContext},
    response::{Response, ResponseError, ResponseResult},
};

fn create_message(response: Response) -> CreateInteractionResponseMessage {
    let mut reply = CreateInteractionResponseMessage::new();
    if let Some(content) = response.content {
        reply = reply.content(content);
    }
    if let Some(embeds) = response.embeds {
        reply = reply.embeds(embeds);
    }
    if let Some(allowed_mentions) = response.allowed_mentions {
        reply = reply.allowed_mentions(allowed_mentions);
    }
    if response.ephemeral {
        reply = reply.ephemeral(true);
    }
    reply
}

fn edit_message(response: Response) -> EditInteractionResponse {
    let mut edit = EditInteractionResponse::new();
    if let Some(content) = response.content {
        edit = edit.content(content);
    }
    if let Some(embeds) = response.embeds {
        edit = edit.embeds(embeds);
    }
    if let Some(allowed_mentions) = response.allowed_mentions {
        edit = edit.allowed_mentions(allowed_mentions);
    }
    edit
}

fn error_response(error: ResponseError) -> Response {
    let (title, description) = match error {
        ResponseError::Execution(title, description) => (title, description),
        ResponseError::Serenity(err) => {
            error!("Command failed on Discord. Failed with error: {:?}", err);
            ("Something went wrong", Some("Please try again later".to_string()))
        }
    };

    let mut embed = CreateEmbed::new().title(title).color(0xf0_4747);
    if let Some(description) = description {
        embed = embed.description(description);
    }
    Response::new().embed(embed).ephemeral(true)
}

async fn create_response(
    http: &Http,
    cmd: &CommandInteraction,
    response: Response,
) -> Result<Message, ResponseError> {
    if let Err(err) = cmd
        .create_response(http, CreateInteractionResponse::Message(create_message(response)))
        .await
    {
        error!("Attempted to create a response to a command, failed with error: {err}");
        return Err(ResponseError::Serenity(err));
    }

    match cmd.get_response(http).await {
        Ok(message) => Ok(message),
        Err(err) => {
            error!("A message was sent, but failed to fetch, failed with error: {err}");
            Err(ResponseError::Serenity(err))
        }
    }
}

#[async_trait::async_trait]
impl CommandContextReply for CommandContext {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError> {
        let start = std::time::Instant::now();
        let message = if self.has_responsed.load(Ordering::Relaxed) {
            match cmd
                .edit_response(&self.ctx.http, edit_message(response))
                .await
            {
                Ok(message) => message,
                Err(err) => {
                    error!("Attempted to edit a response to a command, failed with error: {err}");
                    return Err(ResponseError::Serenity(err));
                }
            }
        } else {
            let message = create_response(&self.ctx.http, cmd, response).await?;
            self.has_responsed.store(true, Ordering::Relaxed);
            message
        };
        debug!("Took {:?} to reply to a command", start.elapsed());
        Ok(message)
    }

    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult {
        self.reply_get_message(cmd, response).await?;
        Ok(())
    }

    async fn error_message(
        &self,
        cmd: &CommandInteraction,
        error: ResponseError,
    ) -> ResponseResult {
        self.reply(cmd, error_response(error)).await
    }
}

#[async_trait::async_trait]
impl CommandContextReply for FailedCommandContext {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError> {
        let start = std::time::Instant::now();
        let message = create_response(&self.ctx.http, cmd, response).await?;
        debug!("Took {:?} to reply to a command", start.elapsed());
        Ok(message)
    }

    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult {
        self.reply_get_message(cmd, response).await?;
        Ok(())
    }

    async fn error_message(
        &self,
        cmd: &CommandInteraction,
        error: ResponseError,
    ) -> ResponseResult {
        self.reply(cmd, error_response(error)).await
    }
}
