use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{InboundEvent, OutboundMessage};

/// Inbound half of a joined chat session
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Wait for the next event. An error means the session is gone.
    async fn receive(&self) -> Result<InboundEvent, BotError>;
}

/// Outbound half of a joined chat session
#[async_trait]
pub trait StanzaSink: Send + Sync {
    /// Send a structured chat or groupchat message
    async fn send_plain(&self, message: &OutboundMessage) -> Result<(), BotError>;

    /// Write an already serialized stanza to the stream
    async fn send_raw(&self, stanza: &str) -> Result<(), BotError>;
}
