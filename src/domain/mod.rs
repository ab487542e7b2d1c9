//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (events, messages, commands, exams)
//! - Traits: Abstractions for infrastructure (session, media lookup, clock)

pub mod entities;
pub mod traits;
