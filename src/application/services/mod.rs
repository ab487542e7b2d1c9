//! Application services - Business logic orchestration

pub mod composer;
pub mod message_service;
pub mod outbox;
pub mod scheduler;

pub use message_service::MessageService;
pub use outbox::Outbox;
pub use scheduler::DeadlineScheduler;
