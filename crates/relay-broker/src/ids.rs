// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! Prefix-tagged identifiers. 8 bytes from the OS RNG rendered as hex; at
//! this scale the birthday probability of a collision is negligible, so
//! there is no collision handling.

use rand::rngs::OsRng;
use rand::RngCore;

/// `ag-` + 16 hex chars.
pub fn agent_id() -> String {
    format!("ag-{}", random_suffix())
}

/// `msg-` + 16 hex chars.
pub fn message_id() -> String {
    format!("msg-{}", random_suffix())
}

fn random_suffix() -> String {
    let mut bytes = [0u8; 8];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_shape() {
        let id = agent_id();
        assert!(id.starts_with("ag-"));
        assert_eq!(id.len(), 3 + 16);
        assert!(id[3..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn message_id_shape() {
        let id = message_id();
        assert!(id.starts_with("msg-"));
        assert_eq!(id.len(), 4 + 16);
    }

    #[test]
    fn ids_are_unique_in_practice() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(agent_id()));
        }
    }
}
