use std::sync::Arc;

use async_trait::async_trait;
use serenity::http::{Http, HttpError};
use serenity::model::id::{ChannelId as DiscordChannel, MessageId as DiscordMessage};
use serenity::Error as SerenityError;
use teamsync_core::errors::{SyncError, SyncResult};
use teamsync_core::models::{ChannelId, MessageId};
use teamsync_core::ports::{Emitter, OutgoingMessage};
use tracing::debug;

use crate::components::rsvp_buttons;

/// [`Emitter`] over the Discord REST client.
#[derive(Clone)]
pub struct SerenityEmitter {
    http: Arc<Http>,
}

impl SerenityEmitter {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    pub fn from_token(token: &str) -> Self {
        Self::new(Arc::new(Http::new(token)))
    }
}

/// Discord answers 403/404 for channels that were deleted or hidden from the bot.
fn is_missing_channel(err: &SerenityError) -> bool {
    match err {
        SerenityError::Http(http) => matches!(
            http.as_ref(),
            HttpError::UnsuccessfulRequest(response)
                if matches!(response.status_code.as_u16(), 403 | 404)
        ),
        _ => false,
    }
}

fn delivery(action: &str, channel_id: ChannelId, err: SerenityError) -> SyncError {
    SyncError::Delivery(format!("{action} in channel {channel_id}: {err}"))
}

#[async_trait]
impl Emitter for SerenityEmitter {
    async fn channel_available(&self, channel_id: ChannelId) -> SyncResult<bool> {
        match self.http.get_channel(channel_id).await {
            Ok(_) => Ok(true),
            Err(e) if is_missing_channel(&e) => {
                debug!("Channel {} is not reachable: {}", channel_id, e);
                Ok(false)
            }
            Err(e) => Err(delivery("looking up channel", channel_id, e)),
        }
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: &OutgoingMessage,
    ) -> SyncResult<MessageId> {
        let sent = DiscordChannel(channel_id)
            .send_message(&self.http, |m| {
                m.content(&message.content);
                if message.rsvp_controls {
                    m.components(rsvp_buttons);
                }
                m
            })
            .await
            .map_err(|e| delivery("sending message", channel_id, e))?;

        Ok(sent.id.0)
    }

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        message: &OutgoingMessage,
    ) -> SyncResult<()> {
        DiscordChannel(channel_id)
            .edit_message(&self.http, DiscordMessage(message_id), |m| {
                m.content(&message.content);
                if message.rsvp_controls {
                    m.components(rsvp_buttons);
                }
                m
            })
            .await
            .map_err(|e| delivery("editing message", channel_id, e))?;

        Ok(())
    }
}
