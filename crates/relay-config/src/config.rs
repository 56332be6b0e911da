//! Configuration management for the relay.
//!
//! Precedence, lowest first: built-in defaults, `config.json`, environment
//! variables. Command-line flags are applied on top by the binary.

use crate::{CoreError, CoreResult, Paths};
use room_ledger::PagePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default Redis connection URL.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Which ordered store backs the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Process memory; lost on exit.
    Memory,
    #[default]
    Redis,
    /// `relay.sqlite` under the base directory.
    Sqlite,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Memory => "memory",
            StoreKind::Redis => "redis",
            StoreKind::Sqlite => "sqlite",
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "redis" => Ok(StoreKind::Redis),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => Err(format!(
                "unknown store '{other}' (expected 'memory', 'redis' or 'sqlite')"
            )),
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main relay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Backing store for rooms.
    pub store: StoreKind,
    /// Redis URL, used when `store` is `redis`.
    pub redis_url: String,
    /// Prepended to every room key to form its collection name.
    pub key_prefix: String,
    /// How pulls cut pages.
    pub page_policy: PagePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            store: StoreKind::default(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            key_prefix: String::new(),
            page_policy: PagePolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from the base directory, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    ///
    /// `lookup` resolves a variable name to its value. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(level) = var("CHAT_RELAY_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(store) = var("CHAT_RELAY_STORE") {
            self.store = store
                .parse()
                .map_err(|e| CoreError::Config(format!("CHAT_RELAY_STORE: {e}")))?;
        }
        if let Some(url) = var("REDIS_URL") {
            self.redis_url = url;
        }
        if let Some(prefix) = lookup("CHAT_RELAY_KEY_PREFIX") {
            self.key_prefix = prefix;
        }
        if let Some(policy) = var("CHAT_RELAY_PAGE_POLICY") {
            self.page_policy = policy
                .parse()
                .map_err(|e| CoreError::Config(format!("CHAT_RELAY_PAGE_POLICY: {e}")))?;
        }
        Ok(())
    }
}
