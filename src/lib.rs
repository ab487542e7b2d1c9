//! Svensson - a group-chat bot engine
//!
//! Reacts to commands addressed to it by nickname inside a multi-user chat
//! room, shares gifs as out-of-band media stanzas, and reminds a recipient
//! of upcoming exams on its own timer.

pub mod domain;
pub mod application;
pub mod infrastructure;
