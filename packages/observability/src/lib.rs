//! # Observability
//!
//! Logging setup shared by every chat-relay binary.
//!
//! ## Design Philosophy
//!
//! Services are **log producers**. They call `observability::init()` or
//! [`init_with_config`] once at startup and use standard `tracing` macros
//! everywhere else. Where the lines end up is decided here and nowhere else.
//!
//! ## Outputs
//!
//! - With a `log_path`, every event is appended to that file as one JSON object
//!   per line (`timestamp`, `level`, `service`, `pid`, `target`, `message`, the
//!   relay's [`CONTEXT_FIELDS`] when present, then `fields`), optionally
//!   mirrored to stderr in compact form.
//! - Without one, events go to stderr in compact form only.
//!
//! `RUST_LOG` always wins over the configured default level.
//!
//! ## Usage
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "chat-relay".into(),
//!     default_level: "debug".into(),
//!     log_path: Some("/tmp/relay.jsonl".into()),
//!     also_stderr: true,
//! })?;
//! tracing::info!("relay started");
//! ```

mod file_writer;
mod json_layer;

use std::io;
use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use file_writer::LogFileWriter;
pub use json_layer::{JsonLayer, LogEntry, CONTEXT_FIELDS};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, included in every JSON line.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// JSONL output file. `None` logs to stderr only.
    pub log_path: Option<PathBuf>,

    /// Also emit compact logs to stderr when writing to a file.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Initialize logging to stderr for the named service.
pub fn init(service_name: &str) -> io::Result<()> {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    })
}

/// Initialize logging with custom configuration.
///
/// Fails if the log file cannot be opened. Installing a second global
/// subscriber is a no-op.
pub fn init_with_config(config: LogConfig) -> io::Result<()> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.default_level))
    };

    let Some(log_path) = config.log_path.clone() else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_target(true)
            .with_writer(io::stderr)
            .compact()
            .try_init();
        return Ok(());
    };

    let writer = LogFileWriter::open(&log_path)?;
    let json_layer = JsonLayer::new(config.service_name.as_str(), writer);

    let stderr_layer = config.also_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_writer(io::stderr)
            .with_filter(filter())
    });

    let installed = tracing_subscriber::registry()
        .with(json_layer.with_filter(filter()))
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            service = %config.service_name,
            log_path = %log_path.display(),
            "observability initialized"
        );
    }
    Ok(())
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export Level for advanced filtering.
pub use tracing::Level;
