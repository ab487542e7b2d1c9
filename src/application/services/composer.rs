//! Outbound message composition

use crate::application::errors::BotError;
use crate::application::messaging::markup::{escape_markup, new_nonce};
use crate::domain::entities::{MessageKind, OutboundMessage};

/// Plain chat or groupchat message. The session encodes it.
pub fn compose_plain(target: impl Into<String>, kind: MessageKind, body: impl Into<String>) -> OutboundMessage {
    OutboundMessage::new(target, kind, body)
}

/// Serialize a message carrying a `jabber:x:oob` media reference.
///
/// Target, kind and body are escaped. The URI is written as is and must
/// already be a valid, encoded URI. Each call draws a fresh stanza id.
pub fn compose_oob(target: &str, kind: MessageKind, body: &str, uri: &str) -> Result<String, BotError> {
    let id = new_nonce()?;
    Ok(format!(
        "<message to='{}' type='{}' id='{}' xml:lang='en'><body>{}</body><x xmlns='jabber:x:oob'><url>{}</url></x></message>",
        escape_markup(target),
        escape_markup(kind.as_str()),
        id,
        escape_markup(body),
        uri,
    ))
}

/// Serialize an [`OutboundMessage`] that has an `oob_uri`.
pub fn compose_message_oob(message: &OutboundMessage) -> Result<Option<String>, BotError> {
    match &message.oob_uri {
        Some(uri) => compose_oob(&message.target, message.kind, &message.body, uri).map(Some),
        None => Ok(None),
    }
}
