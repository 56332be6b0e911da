//! Error types for the room ledger.

use crate::store::StoreError;
use thiserror::Error;

/// Ledger error type.
///
/// Every variant is terminal for the request that produced it.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Chat descriptor is not exactly two `:`-separated, non-empty identifiers
    #[error("Invalid chat format: '{0}'. Chat should be in the format of 'user1:user2'")]
    InvalidChatFormat(String),

    /// Sender is not one of the two participants named in the chat descriptor
    #[error("User '{sender}' is not a member of the chat room '{chat}'")]
    NotAMember { sender: String, chat: String },

    /// Negative cursor or limit
    #[error("Invalid page request: {0}")]
    InvalidPageRequest(String),

    /// Backing store call failed or returned malformed data
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] StoreError),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
