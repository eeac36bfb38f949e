// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! NATS JetStream implementation of [`Transport`].
//!
//! One named stream covers the whole `relay.agent.>` subject tree. Publishes
//! go through the JetStream context and wait for the server ack; live
//! delivery uses a core NATS subscription per subject, forwarded to the
//! broker callback by a spawned task. History reads go straight to the
//! stream by sequence.

use std::time::Duration;

use async_nats::jetstream::{
    self,
    stream::{Config as StreamConfig, DiscardPolicy, RetentionPolicy, StorageType},
    Context as JetStreamContext,
};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::{MessageCallback, StreamInfo, Subscription, Transport, TransportError};

#[derive(Debug)]
pub struct NatsTransport {
    client: async_nats::Client,
    jetstream: JetStreamContext,
    stream_name: String,
}

impl NatsTransport {
    /// Connect to the NATS server and idempotently ensure the stream.
    ///
    /// Fails with [`TransportError::Unavailable`] when the server cannot be
    /// reached, and with [`TransportError::Stream`] when the stream cannot be
    /// created or updated.
    pub async fn connect(
        url: &str,
        stream_name: &str,
        subjects: Vec<String>,
        max_age: Duration,
    ) -> Result<Self, TransportError> {
        info!(url = %url, "connecting to NATS");
        let client = async_nats::connect(url)
            .await
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;
        let jetstream = jetstream::new(client.clone());

        let transport = Self {
            client,
            jetstream,
            stream_name: stream_name.to_string(),
        };
        transport.ensure_stream(subjects, max_age).await?;
        Ok(transport)
    }

    /// Create the stream on first run; update its configuration on later runs.
    async fn ensure_stream(
        &self,
        subjects: Vec<String>,
        max_age: Duration,
    ) -> Result<(), TransportError> {
        let config = StreamConfig {
            name: self.stream_name.clone(),
            subjects,
            retention: RetentionPolicy::Limits,
            discard: DiscardPolicy::Old,
            max_age,
            storage: StorageType::File,
            ..Default::default()
        };

        match self.jetstream.get_stream(&self.stream_name).await {
            Ok(_) => {
                debug!(stream = %self.stream_name, "stream exists, updating config");
                self.jetstream
                    .update_stream(config)
                    .await
                    .map_err(|e| TransportError::Stream(e.to_string()))?;
            }
            Err(_) => {
                info!(stream = %self.stream_name, "creating stream");
                self.jetstream
                    .create_stream(config)
                    .await
                    .map_err(|e| TransportError::Stream(e.to_string()))?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for NatsTransport {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<u64, TransportError> {
        let ack_future = self
            .jetstream
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| TransportError::Publish(e.to_string()))?;
        // The first await sends; this one waits for the stream append ack.
        let ack = ack_future
            .await
            .map_err(|e| TransportError::Publish(e.to_string()))?;
        debug!(subject = %subject, seq = ack.sequence, "published");
        Ok(ack.sequence)
    }

    async fn subscribe(
        &self,
        subject: &str,
        on_message: MessageCallback,
    ) -> Result<Subscription, TransportError> {
        let mut subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;
        // Flush so the server has registered the subscription before we
        // report success; a publish racing an unflushed SUB would be lost.
        self.client
            .flush()
            .await
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;

        let forwarder_subject = subject.to_string();
        let handle = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                on_message(msg.payload.to_vec());
            }
            debug!(subject = %forwarder_subject, "subscription stream ended");
        });

        // Aborting the forwarder drops the Subscriber, which removes the
        // subscription from the client.
        Ok(Subscription::new(move || handle.abort()))
    }

    async fn stream_info(&self) -> Result<StreamInfo, TransportError> {
        let mut stream = self
            .jetstream
            .get_stream(&self.stream_name)
            .await
            .map_err(|e| TransportError::Stream(e.to_string()))?;
        let info = stream
            .info()
            .await
            .map_err(|e| TransportError::Stream(e.to_string()))?;
        Ok(StreamInfo {
            first_seq: info.state.first_sequence,
            last_seq: info.state.last_sequence,
            messages: info.state.messages,
        })
    }

    async fn message_by_seq(&self, seq: u64) -> Result<Option<Vec<u8>>, TransportError> {
        let stream = self
            .jetstream
            .get_stream(&self.stream_name)
            .await
            .map_err(|e| TransportError::Stream(e.to_string()))?;
        match stream.get_raw_message(seq).await {
            Ok(raw) => Ok(Some(raw.payload.to_vec())),
            Err(err) => {
                // Sequence gaps (discarded or deleted messages) are normal
                // during history reads; anything else is a real error.
                let text = err.to_string();
                if text.contains("no message found") {
                    Ok(None)
                } else {
                    warn!(seq, error = %text, "stream read failed");
                    Err(TransportError::Stream(text))
                }
            }
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.client
            .flush()
            .await
            .map_err(|e| TransportError::Stream(e.to_string()))
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
//
// Connection-level behavior needs a live NATS server and is covered by the
// memory transport plus the broker integration tests. What can be tested
// here is the failure path of an unreachable server.
