// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The wire envelope. Immutable once assigned; unknown fields on the wire
/// are ignored and malformed records are dropped by the delivery callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// `msg-` prefixed identifier.
    pub id: String,
    /// Sender agent id.
    pub from: String,
    /// Recipient agent id.
    pub to: String,
    pub body: String,
    /// RFC3339 UTC instant assigned at send time.
    pub created_at: DateTime<Utc>,
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Message {
        Message {
            id: "msg-0011223344556677".to_string(),
            from: "ag-aaaaaaaaaaaaaaaa".to_string(),
            to: "ag-bbbbbbbbbbbbbbbb".to_string(),
            body: "hello".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn round_trips_through_json() {
        let m = sample();
        let bytes = serde_json::to_vec(&m).unwrap();
        let back: Message = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn created_at_serializes_as_rfc3339() {
        let m = sample();
        let v: serde_json::Value = serde_json::to_value(&m).unwrap();
        let ts = v["created_at"].as_str().unwrap();
        assert!(ts.contains('T'), "expected RFC3339, got {ts}");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "id": "msg-1", "from": "ag-1", "to": "ag-2", "body": "x",
            "created_at": "2026-01-01T00:00:00Z",
            "priority": "high", "ttl": 30
        }"#;
        let m: Message = serde_json::from_str(json).unwrap();
        assert_eq!(m.body, "x");
    }

    #[test]
    fn malformed_record_fails_to_parse() {
        assert!(serde_json::from_slice::<Message>(b"not json").is_err());
        assert!(serde_json::from_slice::<Message>(b"{\"id\":\"msg-1\"}").is_err());
    }
}
