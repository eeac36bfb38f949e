// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! Best-effort session and harness discovery for auto-binding.
//!
//! Resolution order for a session id:
//! 1. request headers, first non-empty candidate name;
//! 2. the opencode server's session list — the most recently active session
//!    inside the auto-bind window that nobody has claimed yet.
//! Lookup failures are logged and read as "no session"; they never fail
//! the calling tool.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use relay_broker::Harness;

/// Header names checked in order when a client did not pass a session id.
pub const SESSION_HEADER_CANDIDATES: &[&str] = &[
    "x-relay-session-id",
    "x-opencode-session-id",
    "x-session-id",
];

pub struct SessionResolver {
    opencode_base_url: String,
    auto_bind_window: chrono::Duration,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OpencodeSession {
    id: String,
    #[serde(default)]
    time: OpencodeSessionTime,
}

#[derive(Debug, Default, Deserialize)]
struct OpencodeSessionTime {
    /// Milliseconds since the epoch.
    #[serde(default)]
    updated: i64,
}

impl SessionResolver {
    pub fn new(opencode_base_url: &str, auto_bind_window_mins: u64, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            opencode_base_url: opencode_base_url.trim_end_matches('/').to_string(),
            auto_bind_window: chrono::Duration::minutes(auto_bind_window_mins as i64),
            client,
        }
    }

    /// First non-empty candidate header value, if any.
    pub fn from_headers(&self, headers: &HashMap<String, String>) -> Option<String> {
        for name in SESSION_HEADER_CANDIDATES {
            if let Some(value) = headers.get(*name) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
        None
    }

    /// Resolve a session id for auto-binding: headers first, then the
    /// external recent-session lookup. `bound` holds session ids that are
    /// already taken.
    pub async fn resolve_session(
        &self,
        headers: &HashMap<String, String>,
        bound: &HashSet<String>,
    ) -> Option<String> {
        if let Some(sid) = self.from_headers(headers) {
            return Some(sid);
        }
        self.recent_unbound_session(bound).await
    }

    /// Ask the opencode server for its sessions and pick the most recently
    /// active unbound one inside the window.
    async fn recent_unbound_session(&self, bound: &HashSet<String>) -> Option<String> {
        if self.opencode_base_url.is_empty() {
            return None;
        }
        let url = format!("{}/session", self.opencode_base_url);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(err) => {
                warn!(error = %err, "recent-session lookup failed");
                return None;
            }
        };
        let mut sessions: Vec<OpencodeSession> = match response.json().await {
            Ok(s) => s,
            Err(err) => {
                warn!(error = %err, "recent-session response unparseable");
                return None;
            }
        };

        let cutoff_ms = (Utc::now() - self.auto_bind_window).timestamp_millis();
        sessions.retain(|s| s.time.updated >= cutoff_ms && !bound.contains(&s.id));
        sessions.sort_by(|a, b| b.time.updated.cmp(&a.time.updated));
        let picked = sessions.into_iter().next().map(|s| s.id);
        if let Some(id) = &picked {
            debug!(session = %id, "auto-bind candidate from recent-session lookup");
        }
        picked
    }

    /// Parse an explicit harness value, or infer one from the environment
    /// when the caller sent none. Explicit-but-unknown values are errors.
    pub fn resolve_harness(&self, explicit: Option<&str>) -> Result<Harness, String> {
        match explicit {
            Some(value) => {
                Harness::parse(value).ok_or_else(|| format!("unknown harness: {value:?}"))
            }
            None => Ok(Self::harness_from_env()),
        }
    }

    /// Known harnesses mark their child processes with an env var.
    pub fn harness_from_env() -> Harness {
        let set = |name: &str| std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false);
        if set("OPENCODE") || set("OPENCODE_SERVER") {
            Harness::Opencode
        } else if set("CLAUDECODE") || set("CLAUDE_CODE") {
            Harness::ClaudeCode
        } else if set("CODEX_HOME") || set("CODEX_SANDBOX") {
            Harness::Codex
        } else {
            Harness::Generic
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
