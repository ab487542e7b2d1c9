use super::MessageKind;

/// Message the bot sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub target: String,
    pub kind: MessageKind,
    pub body: String,
    /// Out-of-band media reference; goes in its own element, never in `body`.
    pub oob_uri: Option<String>,
}

impl OutboundMessage {
    pub fn new(target: impl Into<String>, kind: MessageKind, body: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind,
            body: body.into(),
            oob_uri: None,
        }
    }

    pub fn with_oob(mut self, uri: impl Into<String>) -> Self {
        self.oob_uri = Some(uri.into());
        self
    }

    pub fn is_oob(&self) -> bool {
        self.oob_uri.is_some()
    }
}
