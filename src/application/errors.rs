//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    /// Receiving from (or connecting to) the session failed. Ends the bot.
    #[error("Transport error: {0}")]
    TransportFatal(String),

    /// An outbound send failed. Reported, never fatal.
    #[error("Send failed: {0}")]
    SendFailure(String),

    #[error("Media resolution failed: {0}")]
    Media(#[from] MediaError),

    #[error("Random source unavailable: {0}")]
    RandomSource(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),
}

/// Media lookup errors
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No results for query")]
    NoResults,

    #[error("Missing field in response: {0}")]
    MissingField(&'static str),
}

/// Reminder schedule errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid calendar date: month {month}, day {day}")]
    InvalidDate { month: u32, day: u32 },

    #[error("No events to schedule")]
    Empty,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
