// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! `relay-push` — best-effort side channels that notify a bound session of
//! an incoming message outside the MCP tool-call loop.
//!
//! An adapter is a `{harness name, enabled, push}` capability set behind
//! the [`PushAdapter`] trait, registered in a name-keyed [`PushRegistry`].
//! A push failure never fails or blocks the originating send: the tool
//! surface fires pushes on a detached task and only logs errors.
//!
//! Two adapters ship built in:
//! - [`OpencodeAdapter`] injects a prompt into the recipient's opencode
//!   session over HTTP and raises a TUI toast.
//! - [`ClaudeCodeAdapter`] appends a pending-message record to a JSON state
//!   file (atomic temp-write + rename) and fires a desktop notification.

mod claude_code;
mod opencode;
mod registry;

pub use claude_code::{ClaudeCodeAdapter, PendingRecord, PENDING_FILE};
pub use opencode::OpencodeAdapter;
pub use registry::PushRegistry;

use async_trait::async_trait;
use thiserror::Error;

use relay_broker::Message;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("unknown harness: {0}")]
    UnknownHarness(String),

    #[error("push http error: {0}")]
    Http(String),

    #[error("state file error: {0}")]
    StateFile(String),
}

/// A harness-specific notification backend.
#[async_trait]
pub trait PushAdapter: Send + Sync {
    /// Harness name this adapter serves, e.g. `"opencode"`.
    fn harness(&self) -> &str;

    /// Disabled adapters are silently skipped by the registry.
    fn enabled(&self) -> bool;

    /// Deliver a notification for `message` to the session. Best effort:
    /// callers log failures and move on.
    async fn push(
        &self,
        session_id: &str,
        recipient: &str,
        message: &Message,
    ) -> Result<(), PushError>;
}
