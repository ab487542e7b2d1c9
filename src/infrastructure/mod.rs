//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Giphy: Media search client
//! - Adapters: Session implementations (console)

pub mod config;
pub mod giphy;
pub mod adapters;
