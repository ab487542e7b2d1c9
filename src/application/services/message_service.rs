use std::sync::Arc;

use crate::application::errors::BotError;
use crate::domain::entities::{MessageKind, OutboundMessage};
use crate::domain::traits::StanzaSink;
use super::composer::{compose_message_oob, compose_plain};

/// Service for sending messages through the session
#[derive(Clone)]
pub struct MessageService {
    sink: Arc<dyn StanzaSink>,
}

impl MessageService {
    pub fn new(sink: Arc<dyn StanzaSink>) -> Self {
        Self { sink }
    }

    /// Send a plain text message
    pub async fn respond(&self, target: &str, kind: MessageKind, text: &str) -> Result<(), BotError> {
        let message = compose_plain(target, kind, text);
        tracing::debug!("Sending {} to {}: {}", kind, target, text);
        self.sink.send_plain(&message).await
    }

    /// Share a media URI out-of-band; the URI doubles as the body text.
    pub async fn share_media(&self, target: &str, kind: MessageKind, uri: &str) -> Result<(), BotError> {
        let message = OutboundMessage::new(target, kind, uri).with_oob(uri);
        self.send(&message).await
    }

    /// Send any outbound message, choosing the raw path for out-of-band ones.
    pub async fn send(&self, message: &OutboundMessage) -> Result<(), BotError> {
        match compose_message_oob(message)? {
            Some(stanza) => {
                tracing::debug!("Sending out-of-band {} to {}", message.kind, message.target);
                self.sink.send_raw(&stanza).await
            }
            None => self.sink.send_plain(message).await,
        }
    }
}
