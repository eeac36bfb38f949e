// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! `relay-transport` — the durable pub/sub seam of the broker.
//!
//! The broker never talks to NATS directly; it goes through the [`Transport`]
//! trait so that tests (and offline development) can swap in the in-process
//! [`MemoryTransport`]. The production implementation is [`NatsTransport`],
//! which manages a single JetStream stream over the `relay.agent.>` subject
//! tree.
//!
//! Contract highlights:
//! - `publish` resolves only after the stream has acknowledged the append.
//!   Fire-and-forget publishing is not part of this interface.
//! - `subscribe` delivers messages in arrival order within one subject.
//! - `message_by_seq` reads historical messages back out of the stream;
//!   deleted or missing sequences read as `None`, not as errors.

mod memory;
mod nats;

pub use memory::MemoryTransport;
pub use nats::NatsTransport;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Callback invoked for every message landing on a subscribed subject.
///
/// Callbacks run on transport worker tasks and must not block for long; the
/// broker's callback only takes a mutex and appends to a queue.
pub type MessageCallback = Arc<dyn Fn(Vec<u8>) + Send + Sync>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("subscribe failed: {0}")]
    Subscribe(String),

    #[error("stream error: {0}")]
    Stream(String),
}

/// Aggregate state of the durable stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamInfo {
    pub first_seq: u64,
    pub last_seq: u64,
    pub messages: u64,
}

/// Handle for one active subject subscription.
///
/// Dropping the handle without calling [`Subscription::unsubscribe`] leaks
/// the underlying subscription until the transport is closed; the broker
/// always unsubscribes when it removes an agent.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop delivery. Idempotent; safe to call once per handle.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Durable, subject-based pub/sub service as the broker sees it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Append `payload` to the stream under `subject`. Returns the stream
    /// sequence assigned by the server. Resolves only after the append has
    /// been acknowledged.
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<u64, TransportError>;

    /// Subscribe to `subject`, invoking `on_message` for each delivery in
    /// per-subject arrival order.
    async fn subscribe(
        &self,
        subject: &str,
        on_message: MessageCallback,
    ) -> Result<Subscription, TransportError>;

    /// Current first/last sequence and message count of the stream.
    async fn stream_info(&self) -> Result<StreamInfo, TransportError>;

    /// Read one stored message by stream sequence. `None` when the sequence
    /// does not (or no longer does) exist.
    async fn message_by_seq(&self, seq: u64) -> Result<Option<Vec<u8>>, TransportError>;

    /// Flush pending work and close the connection.
    async fn close(&self) -> Result<(), TransportError>;
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn subscription_runs_cancel_exactly_once() {
        static RAN: AtomicBool = AtomicBool::new(false);
        let sub = Subscription::new(|| {
            RAN.store(true, Ordering::SeqCst);
        });
        sub.unsubscribe();
        assert!(RAN.load(Ordering::SeqCst));
    }

    #[test]
    fn stream_info_default_is_empty() {
        let info = StreamInfo::default();
        assert_eq!(info.messages, 0);
        assert_eq!(info.first_seq, 0);
        assert_eq!(info.last_seq, 0);
    }

    #[test]
    fn transport_error_messages_are_single_line() {
        let e = TransportError::Unavailable("connection refused".into());
        assert!(!e.to_string().contains('\n'));
        assert!(e.to_string().contains("transport unavailable"));
    }
}
