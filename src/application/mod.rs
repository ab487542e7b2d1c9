//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Errors: Bot-wide error taxonomy
//! - Messaging: Markup helpers, tokenizing, event dispatching
//! - Services: Message composition, the outbox, the reminder scheduler

pub mod errors;
pub mod services;
pub mod messaging;
