//! IPC handler implementations.
//!
//! Handlers are thin: decode params, call the ledger, map the outcome to a
//! response.

pub mod chat;
pub mod health;
