use std::fmt;
use std::str::FromStr;

/// Message type attribute of a chat stanza
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    GroupChat,
    Chat,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::GroupChat => "groupchat",
            MessageKind::Chat => "chat",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groupchat" => Ok(MessageKind::GroupChat),
            "chat" => Ok(MessageKind::Chat),
            other => Err(format!("unknown message kind: {}", other)),
        }
    }
}

/// Availability carried by a presence update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceShow {
    Online,
    Away,
    Xa,
    Dnd,
    Unavailable,
    Error,
}

impl PresenceShow {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceShow::Online => "online",
            PresenceShow::Away => "away",
            PresenceShow::Xa => "xa",
            PresenceShow::Dnd => "dnd",
            PresenceShow::Unavailable => "unavailable",
            PresenceShow::Error => "error",
        }
    }
}

impl fmt::Display for PresenceShow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresenceShow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // An absent <show/> means plain availability.
            "" | "online" | "chat" => Ok(PresenceShow::Online),
            "away" => Ok(PresenceShow::Away),
            "xa" => Ok(PresenceShow::Xa),
            "dnd" => Ok(PresenceShow::Dnd),
            "unavailable" => Ok(PresenceShow::Unavailable),
            "error" => Ok(PresenceShow::Error),
            other => Err(format!("unknown presence: {}", other)),
        }
    }
}

/// Event delivered by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message {
        sender: String,
        kind: MessageKind,
        text: String,
    },
    Presence {
        from: String,
        show: PresenceShow,
    },
}

impl InboundEvent {
    pub fn message(sender: impl Into<String>, kind: MessageKind, text: impl Into<String>) -> Self {
        InboundEvent::Message {
            sender: sender.into(),
            kind,
            text: text.into(),
        }
    }

    pub fn presence(from: impl Into<String>, show: PresenceShow) -> Self {
        InboundEvent::Presence {
            from: from.into(),
            show,
        }
    }
}

/// Where a reply to a message should go.
///
/// Room messages arrive from `room@service/nick`; the reply goes to the bare
/// room address. Direct chats are answered at the full sender address.
pub fn reply_target(sender: &str, kind: MessageKind) -> &str {
    match kind {
        MessageKind::GroupChat => sender.split_once('/').map_or(sender, |(bare, _)| bare),
        MessageKind::Chat => sender,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_target_strips_room_nick() {
        assert_eq!(
            reply_target("lounge@conference.example.org/alice", MessageKind::GroupChat),
            "lounge@conference.example.org"
        );
        assert_eq!(
            reply_target("alice@example.org/phone", MessageKind::Chat),
            "alice@example.org/phone"
        );
        assert_eq!(
            reply_target("lounge@conference.example.org", MessageKind::GroupChat),
            "lounge@conference.example.org"
        );
        assert_eq!(
            reply_target("lounge@conference.example.org/a/b", MessageKind::GroupChat),
            "lounge@conference.example.org"
        );
    }

    #[test]
    fn test_presence_show_parse() {
        assert_eq!("".parse::<PresenceShow>(), Ok(PresenceShow::Online));
        assert_eq!("xa".parse::<PresenceShow>(), Ok(PresenceShow::Xa));
        assert!("sleepy".parse::<PresenceShow>().is_err());
    }

    #[test]
    fn test_message_kind_roundtrip() {
        for kind in [MessageKind::GroupChat, MessageKind::Chat] {
            assert_eq!(kind.as_str().parse::<MessageKind>(), Ok(kind));
        }
    }
}
