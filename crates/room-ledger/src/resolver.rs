//! Room identity resolution.
//!
//! A chat descriptor names both participants (`"alice:bob"`). The room key is the
//! same for either order and any casing of the two names.

use crate::error::{LedgerError, LedgerResult};
use crate::types::RoomKey;

const SEPARATOR: char = ':';

/// Splits a chat descriptor into its two raw, case-preserved participants.
///
/// Fails unless the descriptor holds exactly one separator with a non-empty name on
/// each side.
pub fn split_chat(chat: &str) -> LedgerResult<(&str, &str)> {
    let mut parts = chat.split(SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) if !first.is_empty() && !second.is_empty() => {
            Ok((first, second))
        }
        _ => Err(LedgerError::InvalidChatFormat(chat.to_string())),
    }
}

/// Resolves a chat descriptor to its canonical room key.
pub fn resolve_room(chat: &str) -> LedgerResult<RoomKey> {
    let (first, second) = split_chat(chat)?;
    let first = first.to_lowercase();
    let second = second.to_lowercase();

    if first <= second {
        Ok(RoomKey::from_sorted(&first, &second))
    } else {
        Ok(RoomKey::from_sorted(&second, &first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_preserves_case() {
        assert_eq!(split_chat("Alice:bob").unwrap(), ("Alice", "bob"));
    }

    #[test]
    fn test_resolve_sorts_and_lowercases() {
        assert_eq!(resolve_room("bob:alice").unwrap().as_str(), "alice:bob");
        assert_eq!(resolve_room("BOB:Alice").unwrap().as_str(), "alice:bob");
    }

    #[test]
    fn test_resolve_self_chat() {
        assert_eq!(resolve_room("Ann:ann").unwrap().as_str(), "ann:ann");
    }

    #[test]
    fn test_rejects_malformed_descriptors() {
        for chat in ["", "alice", "a:b:c", ":bob", "alice:", ":", "a::b"] {
            assert!(
                matches!(resolve_room(chat), Err(LedgerError::InvalidChatFormat(_))),
                "{chat:?} should be rejected"
            );
        }
    }
}
