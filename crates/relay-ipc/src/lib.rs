//! IPC layer for relay-client communication.
//!
//! This crate provides:
//! - Unix domain socket server
//! - JSON-RPC-like protocol
//! - Request/response handling

mod error;
mod protocol;
mod server;

pub use error::{IpcError, IpcResult};
pub use protocol::{
    error_codes, ErrorInfo, Method, PullParams, PullReply, Request, Response, SendParams,
    SendReply, WireMessage,
};
pub use server::{IpcClient, IpcServer};
