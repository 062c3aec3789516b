//! Configuration file management.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shopform_types::ClassificationPolicy;

/// Env var naming the config file. Defaults to `./shopform.toml`.
pub const CONFIG_ENV: &str = "SHOPFORM_CONFIG";
/// Env var overriding the bind address of whichever server is starting.
pub const BIND_ENV: &str = "SHOPFORM_BIND";
/// Env var overriding the store database path.
pub const DATABASE_ENV: &str = "SHOPFORM_DATABASE";

/// Which of the two services is being configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Store,
    Sheet,
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listen addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_store_bind")]
    pub store_bind: String,
    #[serde(default = "default_sheet_bind")]
    pub sheet_bind: String,
}

/// Record-store server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default)]
    pub classification_policy: ClassificationPolicy,
}

/// Where the sheet server keeps the intake details between pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateMode {
    /// Details held server-side under a short-lived draft token.
    #[default]
    Server,
    /// Details round-tripped through hidden form fields.
    Client,
}

/// Spreadsheet server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(default = "default_spreadsheet_name")]
    pub spreadsheet_name: String,
    /// Empty = look the spreadsheet up by name.
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
    #[serde(default)]
    pub state_mode: StateMode,
    #[serde(default = "default_draft_ttl")]
    pub draft_ttl_secs: u64,
    #[serde(default = "default_true")]
    pub dedupe_submissions: bool,
    #[serde(default)]
    pub classification_policy: ClassificationPolicy,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_store_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_sheet_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_database_path() -> String {
    "shopform.db".to_string()
}

fn default_spreadsheet_name() -> String {
    "Shopkeeper Data".to_string()
}

fn default_credentials_path() -> String {
    "credentials.json".to_string()
}

fn default_draft_ttl() -> u64 {
    30 * 60
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            store_bind: default_store_bind(),
            sheet_bind: default_sheet_bind(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            classification_policy: ClassificationPolicy::default(),
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_name: default_spreadsheet_name(),
            spreadsheet_id: String::new(),
            credentials_path: default_credentials_path(),
            state_mode: StateMode::default(),
            draft_ttl_secs: default_draft_ttl(),
            dedupe_submissions: true,
            classification_policy: ClassificationPolicy::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `$SHOPFORM_CONFIG` or `./shopform.toml`.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("shopform.toml"));
        let mut config = Self::load_from(&path)?;
        if let Ok(db) = std::env::var(DATABASE_ENV) {
            config.store.database_path = db;
        }
        Ok(config)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: ServerConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Listen address for a service; `$SHOPFORM_BIND` wins over the file.
    pub fn bind_addr(&self, variant: Variant) -> anyhow::Result<SocketAddr> {
        let configured = match variant {
            Variant::Store => &self.server.store_bind,
            Variant::Sheet => &self.server.sheet_bind,
        };
        let bind = std::env::var(BIND_ENV).unwrap_or_else(|_| configured.clone());
        Ok(bind.parse()?)
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.store.database_path)
    }
}
