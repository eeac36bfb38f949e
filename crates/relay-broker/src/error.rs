// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

use relay_transport::TransportError;

/// Errors surfaced by broker operations.
///
/// Every variant renders as a single line; the tool surface forwards these
/// verbatim inside `{"error": ...}` envelopes.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("agent not found: {0}")]
    AgentNotFound(String),

    #[error("sender agent not found: {0}")]
    SenderUnknown(String),

    #[error("target agent not found: {0}")]
    TargetUnknown(String),

    #[error("session id required")]
    SessionRequired,

    #[error("message not found: {0}")]
    MessageNotFound(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("internal error: {0}")]
    Internal(String),
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
