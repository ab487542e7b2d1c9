//! Console adapter for development/testing
//!
//! Each line on stdin arrives as a groupchat message from the configured
//! room. `/presence <show>` fakes a presence update. Outbound messages and
//! raw stanzas are printed to stdout.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

use crate::application::errors::BotError;
use crate::domain::entities::{InboundEvent, MessageKind, OutboundMessage, PresenceShow};
use crate::domain::traits::{EventSource, StanzaSink};

/// Console session for local development
pub struct ConsoleSession<R = BufReader<Stdin>> {
    room: String,
    user: String,
    input: Mutex<R>,
}

impl ConsoleSession {
    pub fn new(room: impl Into<String>) -> Self {
        Self::with_input(room, BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsoleSession<R> {
    pub fn with_input(room: impl Into<String>, input: R) -> Self {
        Self {
            room: room.into(),
            user: "console".to_string(),
            input: Mutex::new(input),
        }
    }

    fn sender(&self) -> String {
        format!("{}/{}", self.room, self.user)
    }

    fn parse_line(&self, line: &str) -> InboundEvent {
        if let Some(show) = line.strip_prefix("/presence") {
            match show.trim().parse::<PresenceShow>() {
                Ok(show) => return InboundEvent::presence(self.sender(), show),
                Err(e) => tracing::warn!("{}", e),
            }
        }
        InboundEvent::message(self.sender(), MessageKind::GroupChat, line)
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for ConsoleSession<R> {
    async fn receive(&self) -> Result<InboundEvent, BotError> {
        let mut input = self.input.lock().await;
        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .await
            .map_err(|e| BotError::TransportFatal(e.to_string()))?;
        if read == 0 {
            return Err(BotError::TransportFatal("console input closed".to_string()));
        }
        Ok(self.parse_line(line.trim_end_matches(['\r', '\n'])))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> StanzaSink for ConsoleSession<R> {
    async fn send_plain(&self, message: &OutboundMessage) -> Result<(), BotError> {
        println!("[BOT {} -> {}] {}", message.kind, message.target, message.body);
        Ok(())
    }

    async fn send_raw(&self, stanza: &str) -> Result<(), BotError> {
        println!("{}", stanza);
        Ok(())
    }
}
