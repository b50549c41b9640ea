//! Application settings loaded from config.toml
//!
//! Every section is optional; anything left out falls back to the defaults below.
//! The event section carries the section and category vocabularies used by the
//! dashboard and budget summaries, so they are data rather than compiled-in lists.

use crate::core::summary::SummarySettings;
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Root of config.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Which repository backend to run on
    pub storage: StorageConfig,
    /// Reunion event details and vocabularies
    pub event: EventConfig,
    /// Login session settings
    pub session: SessionConfig,
    /// Initial superadmin account
    pub admin: AdminConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding the listener.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Repository backend selected at process start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Durable `SQLite` store via `SeaORM`
    #[default]
    Sqlite,
    /// Process-local store, lost on restart
    Memory,
}

/// Storage settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// Reunion event details
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Display name of the event
    pub name: String,
    /// Reunion date; the countdown runs towards it
    pub target_date: NaiveDate,
    /// Length of the planning campaign in days, used for progress
    pub campaign_days: i64,
    /// Valid section codes
    pub sections: Vec<String>,
    /// Categories reported in the budget breakdown
    pub budget_categories: Vec<String>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            name: "Reunion".to_string(),
            target_date: NaiveDate::from_ymd_opt(2026, 12, 26).unwrap_or_default(),
            campaign_days: 365,
            sections: ["A", "B", "C", "D"].map(String::from).to_vec(),
            budget_categories: [
                "venue",
                "food",
                "entertainment",
                "decoration",
                "transportation",
                "gifts",
                "technology",
                "marketing",
                "miscellaneous",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl EventConfig {
    /// Whether `section` is one of the configured section codes.
    #[must_use]
    pub fn is_valid_section(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s == section)
    }

    /// Vocabulary and dates handed to the summary computations.
    #[must_use]
    pub fn summary_settings(&self) -> SummarySettings {
        SummarySettings {
            sections: self.sections.clone(),
            categories: self.budget_categories.clone(),
            target_date: self.target_date,
            campaign_days: self.campaign_days,
        }
    }
}

/// Login session settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session lifetime
    pub ttl_hours: i64,
    /// How often expired sessions are swept from memory
    pub cleanup_interval_minutes: u64,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Mark the cookie `Secure` (HTTPS only)
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            cleanup_interval_minutes: 10,
            cookie_name: "reunion_session".to_string(),
            secure_cookie: false,
        }
    }
}

/// Initial superadmin; the password comes from `ADMIN_PASSWORD`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
        }
    }
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.event.sections.is_empty() {
        return Err(Error::Config {
            message: "event.sections must list at least one section".to_string(),
        });
    }
    if config.event.campaign_days <= 0 {
        return Err(Error::Config {
            message: format!(
                "event.campaign_days must be positive, got {}",
                config.event.campaign_days
            ),
        });
    }
    if config.session.ttl_hours <= 0 {
        return Err(Error::Config {
            message: "session.ttl_hours must be positive".to_string(),
        });
    }
    if config.session.cleanup_interval_minutes == 0 {
        return Err(Error::Config {
            message: "session.cleanup_interval_minutes must be positive".to_string(),
        });
    }
    Ok(())
}

/// Parses configuration from TOML text.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a value is out of range.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    validate(&config)?;
    Ok(config)
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    debug!("Loading configuration from {:?}", path.as_ref());
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads configuration from ./config.toml, or the defaults when the file is absent.
pub fn load_default_config() -> Result<AppConfig> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        warn!("config.toml not found, using default configuration");
        Ok(AppConfig::default())
    }
}
