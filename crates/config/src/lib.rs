//! Configuration loading, validation, and management for Chorebot.
//!
//! Loads configuration from `~/.chorebot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use chorebot_core::roster::Roster;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.chorebot/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Roommates in rotation order
    #[serde(default = "default_roommates")]
    pub roommates: Vec<String>,

    /// LINE Messaging API credentials
    #[serde(default)]
    pub line: LineConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Where the rotation state is kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Chat command settings
    #[serde(default)]
    pub bot: BotConfig,
}

fn default_roommates() -> Vec<String> {
    vec!["室友A".into(), "室友B".into(), "室友C".into()]
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LineConfig {
    /// Channel secret, used to verify `X-Line-Signature`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_secret: Option<String>,

    /// Long-lived channel access token for the reply API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_access_token: Option<String>,

    #[serde(default = "default_line_api_base")]
    pub api_base: String,
}

fn default_line_api_base() -> String {
    "https://api.line.me".into()
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret: None,
            channel_access_token: None,
            api_base: default_line_api_base(),
        }
    }
}

impl std::fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineConfig")
            .field("channel_secret", &redact(&self.channel_secret))
            .field("channel_access_token", &redact(&self.channel_access_token))
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Path LINE delivers webhooks to
    #[serde(default = "default_callback_path")]
    pub callback_path: String,
}

fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_callback_path() -> String {
    "/callback".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            callback_path: default_callback_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the state files (default: `~/.chorebot/data`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_cursor_file")]
    pub cursor_file: String,

    #[serde(default = "default_schedules_file")]
    pub schedules_file: String,
}

fn default_cursor_file() -> String {
    "roommate_config.json".into()
}
fn default_schedules_file() -> String {
    "roommate_schedules.json".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            cursor_file: default_cursor_file(),
            schedules_file: default_schedules_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Messages that open the main menu
    #[serde(default = "default_menu_triggers")]
    pub menu_triggers: Vec<String>,
}

fn default_menu_triggers() -> Vec<String> {
    vec!["倒垃圾咪狗".into()]
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            menu_triggers: default_menu_triggers(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.chorebot/config.toml).
    ///
    /// Environment variables override the file, see [`AppConfig::apply_env`].
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path, |key| std::env::var(key).ok())
    }

    /// Load `path`, apply environment overrides from `lookup`, then validate
    /// the merged result.
    pub fn load_with_env(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without environment
    /// overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the file at `path`, defaults when it does not exist. Not validated.
    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply environment overrides (highest priority):
    /// - `CHOREBOT_ROOMMATES`, then `ROOMMATES`: comma-separated names
    /// - `LINE_CHANNEL_SECRET`, `LINE_CHANNEL_ACCESS_TOKEN`
    /// - `PORT`
    /// - `CHOREBOT_DATA_DIR`
    ///
    /// `lookup` is `std::env::var` in production.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(list) = non_empty("CHOREBOT_ROOMMATES").or_else(|| non_empty("ROOMMATES")) {
            self.roommates = list
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
        }

        if let Some(secret) = non_empty("LINE_CHANNEL_SECRET") {
            self.line.channel_secret = Some(secret);
        }
        if let Some(token) = non_empty("LINE_CHANNEL_ACCESS_TOKEN") {
            self.line.channel_access_token = Some(token);
        }

        if let Some(port) = non_empty("PORT") {
            match port.trim().parse() {
                Ok(port) => self.gateway.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid PORT"),
            }
        }

        if let Some(dir) = non_empty("CHOREBOT_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".chorebot")
    }

    /// Directory holding the rotation state files.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("data"))
    }

    /// The configured roommates as a validated roster.
    pub fn roster(&self) -> Result<Roster, ConfigError> {
        Roster::new(self.roommates.iter().cloned())
            .map_err(|e| ConfigError::ValidationError(format!("roommates: {e}")))
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.roster()?;

        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must be non-zero".into(),
            ));
        }

        if !self.gateway.callback_path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "gateway.callback_path must start with '/'".into(),
            ));
        }

        Ok(())
    }

    /// Check if LINE credentials are available (from config or environment).
    pub fn has_line_credentials(&self) -> bool {
        self.line.channel_secret.is_some() && self.line.channel_access_token.is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roommates: default_roommates(),
            line: LineConfig::default(),
            gateway: GatewayConfig::default(),
            storage: StorageConfig::default(),
            bot: BotConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.port, 5000);
        assert_eq!(config.gateway.callback_path, "/callback");
        assert_eq!(config.roster().unwrap().len(), 3);
        assert!(config.validate().is_ok());
        assert!(!config.has_line_credentials());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.roommates, config.roommates);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.storage.cursor_file, "roommate_config.json");
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.bot.menu_triggers, vec!["倒垃圾咪狗".to_string()]);
    }

    #[test]
    fn parses_file_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
roommates = ["Ann", "Ben"]

[line]
channel_secret = "s3cret"

[gateway]
port = 8080

[storage]
data_dir = "/var/lib/chorebot"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.roommates, vec!["Ann", "Ben"]);
        assert_eq!(config.line.channel_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.line.api_base, "https://api.line.me");
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.data_dir(), PathBuf::from("/var/lib/chorebot"));
    }

    #[test]
    fn duplicate_roommates_rejected() {
        let config = AppConfig {
            roommates: vec!["A".into(), "A".into()],
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(msg)) if msg.contains("Duplicate")
        ));
    }

    #[test]
    fn bad_callback_path_rejected() {
        let mut config = AppConfig::default();
        config.gateway.callback_path = "callback".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("ROOMMATES", "Ann, Ben ,Cat"),
            ("LINE_CHANNEL_SECRET", "secret"),
            ("LINE_CHANNEL_ACCESS_TOKEN", "token"),
            ("PORT", "8443"),
            ("CHOREBOT_DATA_DIR", "/srv/chorebot"),
        ]));

        assert_eq!(config.roommates, vec!["Ann", "Ben", "Cat"]);
        assert!(config.has_line_credentials());
        assert_eq!(config.gateway.port, 8443);
        assert_eq!(config.data_dir(), PathBuf::from("/srv/chorebot"));
    }

    #[test]
    fn chorebot_roommates_wins_and_bad_port_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("CHOREBOT_ROOMMATES", "X,Y"),
            ("ROOMMATES", "A,B,C"),
            ("PORT", "not-a-port"),
        ]));
        assert_eq!(config.roommates, vec!["X", "Y"]);
        assert_eq!(config.gateway.port, 5000);
    }

    #[test]
    fn env_roommates_replace_invalid_file_roommates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "roommates = [\"A\", \"A\"]\n").unwrap();

        assert!(AppConfig::load_from(file.path()).is_err());
        assert!(AppConfig::load_with_env(file.path(), env(&[])).is_err());

        let config =
            AppConfig::load_with_env(file.path(), env(&[("ROOMMATES", "Ann,Ben")])).unwrap();
        assert_eq!(config.roommates, vec!["Ann", "Ben"]);
    }

    #[test]
    fn env_override_is_validated() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = AppConfig::load_with_env(file.path(), env(&[("ROOMMATES", "Ann,Ann")]));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = AppConfig::default();
        config.line.channel_secret = Some("very-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("室友A"));
        assert!(toml_str.contains("5000"));
        assert!(toml_str.contains("/callback"));
    }
}
