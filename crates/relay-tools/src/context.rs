// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use tracing::warn;

use relay_broker::{Broker, Harness, Message};
use relay_push::PushRegistry;

use crate::session::SessionResolver;

/// Shared dependencies handed to every tool.
pub struct ToolContext {
    pub broker: Arc<Broker>,
    pub push: Arc<PushRegistry>,
    pub resolver: SessionResolver,
}

impl ToolContext {
    /// Fire the push notification for a just-sent message, if the recipient
    /// has a bound session with a non-generic harness.
    ///
    /// Runs on a detached task after the originating handler has released
    /// every lock; adapter failures are logged, never surfaced.
    pub fn dispatch_push(self: &Arc<Self>, message: &Message) {
        let recipient = message.to.clone();
        let binding = match self.broker.session_binding(&recipient) {
            Ok(b) => b,
            Err(_) => return,
        };
        let (Some(session_id), Some(harness)) = binding else {
            return;
        };
        if harness == Harness::Generic {
            return;
        }

        let ctx = Arc::clone(self);
        let message = message.clone();
        tokio::spawn(async move {
            if let Err(err) = ctx
                .push
                .dispatch(harness.as_str(), &session_id, &message.to, &message)
                .await
            {
                warn!(
                    recipient = %message.to,
                    harness = %harness,
                    error = %err,
                    "push notification failed"
                );
            }
        });
    }
}
