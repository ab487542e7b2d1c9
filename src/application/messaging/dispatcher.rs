//! Event dispatcher - Routes addressed commands to handlers

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::errors::BotError;
use crate::application::services::MessageService;
use crate::domain::entities::{reply_target, CommandTable, InboundEvent, MessageKind, Reply};
use crate::domain::traits::{EventSource, MediaResolver};
use super::markup::strip_query;
use super::parser::MessageParser;

/// What happened to one inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Presence update, logged only
    Observed,
    /// Message not addressed to the bot
    Ignored,
    /// Plain reply sent
    Replied,
    /// Out-of-band media sent
    SharedMedia,
    /// Handling stopped early; already logged
    Abandoned,
}

/// Dispatches session events to the command table
pub struct EventDispatcher {
    parser: MessageParser,
    commands: CommandTable,
    resolver: Arc<dyn MediaResolver>,
    messages: MessageService,
}

impl EventDispatcher {
    pub fn new(
        nick: impl AsRef<str>,
        commands: CommandTable,
        resolver: Arc<dyn MediaResolver>,
        messages: MessageService,
    ) -> Self {
        Self {
            parser: MessageParser::new(nick),
            commands,
            resolver,
            messages,
        }
    }

    /// Receive and handle events until cancelled or the session fails.
    ///
    /// Only a receive error ends the loop with `Err`; everything else is
    /// logged and skipped.
    pub async fn run<E: EventSource + ?Sized>(&self, source: &E, cancel: CancellationToken) -> Result<(), BotError> {
        tracing::info!("Listening for messages as {}", self.parser.nick());

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Dispatcher stopped");
                    return Ok(());
                }
                event = source.receive() => event?,
            };
            self.handle(event).await;
        }
    }

    /// Handle a single event
    pub async fn handle(&self, event: InboundEvent) -> Outcome {
        match event {
            InboundEvent::Presence { from, show } => {
                tracing::info!("{} {}", from, show);
                Outcome::Observed
            }
            InboundEvent::Message { sender, kind, text } => {
                tracing::info!("{} {}", sender, text);

                let Some(invocation) = self.parser.parse(&text) else {
                    return Outcome::Ignored;
                };
                tracing::debug!("Command: {} with args: {:?}", invocation.name(), invocation.args());

                let target = reply_target(&sender, kind);
                match self.commands.dispatch(&invocation) {
                    Reply::Text(reply) => self.reply(target, kind, &reply).await,
                    Reply::Media { query } => self.share(target, kind, &query).await,
                }
            }
        }
    }

    async fn reply(&self, target: &str, kind: MessageKind, text: &str) -> Outcome {
        match self.messages.respond(target, kind, text).await {
            Ok(()) => Outcome::Replied,
            Err(e) => {
                tracing::error!("Failed to reply to {}: {}", target, e);
                Outcome::Abandoned
            }
        }
    }

    async fn share(&self, target: &str, kind: MessageKind, query: &str) -> Outcome {
        let uri = match self.resolver.resolve_media(query).await.and_then(|raw| strip_query(&raw)) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!("No media for {:?}: {}", query, e);
                return Outcome::Abandoned;
            }
        };
        match self.messages.share_media(target, kind, &uri).await {
            Ok(()) => Outcome::SharedMedia,
            Err(e) => {
                tracing::error!("Failed to share media with {}: {}", target, e);
                Outcome::Abandoned
            }
        }
    }
}
