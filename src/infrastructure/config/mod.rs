//! Configuration management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::messaging::{lowercase, tokenize};
use crate::domain::entities::ExamEvent;
use crate::infrastructure::giphy::SEARCH_ENDPOINT;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub server: ServerConfig,
    pub giphy: GiphyConfig,
    pub reminders: RemindersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub nick: String,
    /// Room to join
    pub muc: String,
    pub status: String,
    /// Defaults to "Hello! I'm {nick}"
    pub status_message: Option<String>,
    pub help_command: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub address: String,
    pub username: String,
    pub password: String,
    pub tls: TlsMode,
}

/// How the connection to the server is secured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TlsMode {
    Plain,
    Starttls,
    #[default]
    ImplicitTls,
}

impl TlsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TlsMode::Plain => "plain",
            TlsMode::Starttls => "starttls",
            TlsMode::ImplicitTls => "implicit-tls",
        }
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TlsMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(TlsMode::Plain),
            "starttls" => Ok(TlsMode::Starttls),
            "implicit-tls" => Ok(TlsMode::ImplicitTls),
            other => Err(ConfigError::InvalidValue(format!("tls: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GiphyConfig {
    pub api_key: String,
    pub endpoint: String,
    /// How long an idle pooled connection is kept
    pub idle_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RemindersConfig {
    pub enabled: bool,
    /// Address reminders are sent to as direct chat
    pub recipient: String,
    pub exams: Vec<ExamEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExamEntry {
    pub month: u32,
    pub day: u32,
    pub label: String,
}

impl ExamEntry {
    fn new(month: u32, day: u32, label: &str) -> Self {
        Self { month, day, label: label.to_string() }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            nick: "Svensson".to_string(),
            muc: String::new(),
            status: "xa".to_string(),
            status_message: None,
            help_command: false,
        }
    }
}

impl Default for GiphyConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: SEARCH_ENDPOINT.to_string(),
            idle_timeout_secs: 5,
            request_timeout_secs: 10,
        }
    }
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            recipient: String::new(),
            exams: vec![
                ExamEntry::new(12, 4, "Compiler Construction"),
                ExamEntry::new(12, 18, "Computer Networks"),
                ExamEntry::new(2, 22, "Database Technology"),
                ExamEntry::new(5, 3, "Algorithms and Data Structures"),
                ExamEntry::new(10, 2, "Probability Theory"),
            ],
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(nick) = std::env::var("SVENSSON_NICK") {
            self.bot.nick = nick;
        }
        if let Ok(muc) = std::env::var("SVENSSON_MUC") {
            self.bot.muc = muc;
        }
        if let Ok(address) = std::env::var("SVENSSON_ADDRESS") {
            self.server.address = address;
        }
        if let Ok(username) = std::env::var("SVENSSON_USERNAME") {
            self.server.username = username;
        }
        if let Ok(password) = std::env::var("SVENSSON_PASSWORD") {
            self.server.password = password;
        }
        if let Ok(tls) = std::env::var("SVENSSON_TLS") {
            self.server.tls = tls.parse()?;
        }
        if let Ok(key) = std::env::var("GIPHY_API_KEY") {
            self.giphy.api_key = key;
        }
        Ok(())
    }

    /// Check the fields the bot cannot run without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.muc.trim().is_empty() {
            return Err(ConfigError::MissingField("bot.muc".to_string()));
        }
        if self.server.address.trim().is_empty() {
            return Err(ConfigError::MissingField("server.address".to_string()));
        }
        if self.server.username.trim().is_empty() {
            return Err(ConfigError::MissingField("server.username".to_string()));
        }
        if self.server.password.is_empty() {
            return Err(ConfigError::MissingField("server.password".to_string()));
        }
        if self.giphy.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField("giphy.api-key".to_string()));
        }
        // The nickname is matched against the first token of a message.
        if tokenize(&self.bot.nick) != [lowercase(&self.bot.nick)] {
            return Err(ConfigError::InvalidValue(format!(
                "bot.nick must be a single word of letters and digits: {:?}",
                self.bot.nick
            )));
        }
        if self.reminders.enabled {
            if self.reminders.recipient.trim().is_empty() {
                return Err(ConfigError::MissingField("reminders.recipient".to_string()));
            }
            if self.reminders.exams.is_empty() {
                return Err(ConfigError::MissingField("reminders.exams".to_string()));
            }
        }
        self.exams()?;
        Ok(())
    }

    pub fn status_message(&self) -> String {
        self.bot
            .status_message
            .clone()
            .unwrap_or_else(|| format!("Hello! I'm {}", self.bot.nick))
    }

    /// Host part of the server address, used as the TLS server name
    pub fn tls_server_name(&self) -> &str {
        self.server.address.split(':').next().unwrap_or(&self.server.address)
    }

    pub fn exams(&self) -> Result<Vec<ExamEvent>, ConfigError> {
        self.reminders
            .exams
            .iter()
            .map(|e| {
                ExamEvent::new(e.month, e.day, e.label.clone())
                    .map_err(|err| ConfigError::InvalidValue(format!("reminders.exams: {}", err)))
            })
            .collect()
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.giphy.idle_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.giphy.request_timeout_secs)
    }
}
