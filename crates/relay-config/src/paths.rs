//! File system paths for the relay.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Manages file system paths for the relay.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for relay runtime files (~/.chat-relay)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.chat-relay`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".chat-relay"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.chat-relay).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.chat-relay/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the SQLite database path (~/.chat-relay/relay.sqlite).
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join("relay.sqlite")
    }

    /// Get the IPC socket path (~/.chat-relay/relay.sock).
    pub fn socket_file(&self) -> PathBuf {
        self.base_dir.join("relay.sock")
    }

    /// Get the PID file path (~/.chat-relay/relay.pid).
    pub fn pid_file(&self) -> PathBuf {
        self.base_dir.join("relay.pid")
    }

    /// Get the logs directory (~/.chat-relay/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the relay log file path (~/.chat-relay/logs/relay.jsonl).
    pub fn relay_log_file(&self) -> PathBuf {
        self.logs_dir().join("relay.jsonl")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
