// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! In-process [`Transport`] used by tests and by `transport.backend = memory`.
//!
//! Semantics mirror the NATS implementation closely enough for the broker to
//! be unaware of the difference: publishes are assigned monotonically
//! increasing sequences and recorded in an append-only log ("the stream"),
//! and subscribers receive messages synchronously in publish order. The log
//! does not survive the process, which is exactly the durability a unit test
//! wants.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{MessageCallback, StreamInfo, Subscription, Transport, TransportError};

#[derive(Default)]
struct Inner {
    /// Append-only (seq, subject, payload) log, ordered by seq.
    log: Vec<(u64, String, Vec<u8>)>,
    next_seq: u64,
    subscribers: HashMap<u64, (String, MessageCallback)>,
    next_sub_id: u64,
}

#[derive(Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Subjects may end in `>` to match a whole prefix, like NATS wildcards.
    fn subject_matches(pattern: &str, subject: &str) -> bool {
        if let Some(prefix) = pattern.strip_suffix('>') {
            subject.starts_with(prefix)
        } else {
            pattern == subject
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<u64, TransportError> {
        let (seq, matching) = {
            let mut inner = self.lock();
            inner.next_seq += 1;
            let seq = inner.next_seq;
            inner.log.push((seq, subject.to_string(), payload.clone()));
            let matching: Vec<MessageCallback> = inner
                .subscribers
                .values()
                .filter(|(pattern, _)| Self::subject_matches(pattern, subject))
                .map(|(_, cb)| Arc::clone(cb))
                .collect();
            (seq, matching)
        };
        // Deliver outside the transport lock: callbacks take the broker lock.
        for cb in matching {
            cb(payload.clone());
        }
        Ok(seq)
    }

    async fn subscribe(
        &self,
        subject: &str,
        on_message: MessageCallback,
    ) -> Result<Subscription, TransportError> {
        let sub_id = {
            let mut inner = self.lock();
            inner.next_sub_id += 1;
            let id = inner.next_sub_id;
            inner
                .subscribers
                .insert(id, (subject.to_string(), on_message));
            id
        };
        let transport = self.clone();
        Ok(Subscription::new(move || {
            transport.lock().subscribers.remove(&sub_id);
        }))
    }

    async fn stream_info(&self) -> Result<StreamInfo, TransportError> {
        let inner = self.lock();
        let first_seq = inner.log.first().map(|(seq, _, _)| *seq).unwrap_or(0);
        let last_seq = inner.log.last().map(|(seq, _, _)| *seq).unwrap_or(0);
        Ok(StreamInfo {
            first_seq,
            last_seq,
            messages: inner.log.len() as u64,
        })
    }

    async fn message_by_seq(&self, seq: u64) -> Result<Option<Vec<u8>>, TransportError> {
        let inner = self.lock();
        Ok(inner
            .log
            .binary_search_by_key(&seq, |(s, _, _)| *s)
            .ok()
            .map(|idx| inner.log[idx].2.clone()))
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.lock().subscribers.clear();
        Ok(())
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn publish_assigns_increasing_sequences() {
        let t = MemoryTransport::new();
        let a = t.publish("relay.agent.x", b"1".to_vec()).await.unwrap();
        let b = t.publish("relay.agent.x", b"2".to_vec()).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn subscriber_receives_matching_subject_only() {
        let t = MemoryTransport::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _sub = t
            .subscribe(
                "relay.agent.a",
                Arc::new(move |_| {
                    c.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .unwrap();

        t.publish("relay.agent.a", b"x".to_vec()).await.unwrap();
        t.publish("relay.agent.b", b"y".to_vec()).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wildcard_pattern_matches_prefix() {
        let t = MemoryTransport::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _sub = t
            .subscribe(
                "relay.agent.>",
                Arc::new(move |_| {
                    c.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .unwrap();

        t.publish("relay.agent.a", b"x".to_vec()).await.unwrap();
        t.publish("relay.agent.b", b"y".to_vec()).await.unwrap();
        t.publish("other.subject", b"z".to_vec()).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let t = MemoryTransport::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let sub = t
            .subscribe(
                "relay.agent.a",
                Arc::new(move |_| {
                    c.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .unwrap();

        t.publish("relay.agent.a", b"1".to_vec()).await.unwrap();
        sub.unsubscribe();
        t.publish("relay.agent.a", b"2".to_vec()).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stream_info_reflects_log() {
        let t = MemoryTransport::new();
        assert_eq!(t.stream_info().await.unwrap().messages, 0);
        t.publish("relay.agent.a", b"1".to_vec()).await.unwrap();
        t.publish("relay.agent.a", b"2".to_vec()).await.unwrap();
        let info = t.stream_info().await.unwrap();
        assert_eq!(info.messages, 2);
        assert_eq!(info.first_seq, 1);
        assert_eq!(info.last_seq, 2);
    }

    #[tokio::test]
    async fn message_by_seq_returns_stored_payload() {
        let t = MemoryTransport::new();
        let seq = t.publish("relay.agent.a", b"hello".to_vec()).await.unwrap();
        let payload = t.message_by_seq(seq).await.unwrap();
        assert_eq!(payload.as_deref(), Some(&b"hello"[..]));
    }

    #[tokio::test]
    async fn missing_sequence_reads_as_none() {
        let t = MemoryTransport::new();
        assert!(t.message_by_seq(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delivery_preserves_publish_order() {
        let t = MemoryTransport::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let _sub = t
            .subscribe(
                "relay.agent.a",
                Arc::new(move |bytes| {
                    s.lock().unwrap().push(bytes);
                }),
            )
            .await
            .unwrap();

        for i in 0..5u8 {
            t.publish("relay.agent.a", vec![i]).await.unwrap();
        }
        let got = seen.lock().unwrap().clone();
        assert_eq!(got, vec![vec![0], vec![1], vec![2], vec![3], vec![4]]);
    }
}
