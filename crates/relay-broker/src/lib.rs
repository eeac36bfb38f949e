// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! `relay-broker` — the agent registry and delivery pipeline.
//!
//! One [`Broker`] owns all mutable state behind a single coarse mutex:
//! agent profiles, the session↔agent index, per-agent inbound queues, and
//! the shared-context store. Every agent gets exactly one transport
//! subscription on `relay.agent.<id>`; publishes are durably acknowledged
//! by the stream before `send` returns, and arrivals reach queues only
//! through the subscription callback.
//!
//! ```text
//! send(from, to, body)
//!    │  publish (durable ack)
//!    ▼
//! relay.agent.<to> ── transport ──► delivery callback ──► queue (mutex)
//!                                                           │
//! fetch(to, max) ◄──────────────────────────────────────────┘
//! ```

mod broker;
mod error;
pub mod ids;
mod message;
mod profile;

pub use broker::{
    agent_subject, AgentSnapshot, Broker, BroadcastFilter, BroadcastOutcome, DeliveryState,
    FetchResult, Readiness, StatusRow, DEFAULT_BROADCAST_LIMIT, DEFAULT_FETCH_LIMIT,
    DEFAULT_FIND_LIMIT, DEFAULT_HISTORY_LIMIT, SUBJECT_PREFIX, SUBJECT_WILDCARD,
};
pub use error::BrokerError;
pub use message::Message;
pub use profile::{normalize_project, AgentProfile, AgentStatus, Harness, ProfilePatch};
