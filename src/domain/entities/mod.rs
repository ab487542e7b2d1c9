//! Domain entities - Core business objects with no external dependencies

pub mod event;
pub mod message;
pub mod command;
pub mod exam;

pub use event::{InboundEvent, MessageKind, PresenceShow, reply_target};
pub use message::OutboundMessage;
pub use command::{Command, CommandInvocation, CommandTable, Reply, UNKNOWN_REPLY};
pub use exam::ExamEvent;
