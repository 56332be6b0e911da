//! Configuration, paths, and logging setup for the chat relay.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, StoreKind, DEFAULT_LOG_LEVEL, DEFAULT_REDIS_URL};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
