//! Application wiring and lifecycle management.

mod client;
mod init;
mod lifecycle;
mod state;

pub use client::{pull_messages, send_message};
pub use init::{open_store, run_relay};
pub use lifecycle::{check_status, stop_relay};
pub use state::RelayState;
