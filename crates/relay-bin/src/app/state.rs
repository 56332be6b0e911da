//! Relay state definition.

use relay_config::{Config, Paths};
use room_ledger::Ledger;
use std::sync::Arc;

/// Shared relay state (cheap to clone).
#[derive(Clone)]
pub struct RelayState {
    pub ledger: Ledger,
    pub config: Arc<Config>,
    pub paths: Arc<Paths>,
}

impl RelayState {
    pub fn new(ledger: Ledger, config: Config, paths: Paths) -> Self {
        Self {
            ledger,
            config: Arc::new(config),
            paths: Arc::new(paths),
        }
    }
}
