// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use relay_broker::Message;

use crate::{PushAdapter, PushError};

/// Name-keyed adapter registry. Immutable after construction; the tool
/// surface shares it behind an `Arc`.
#[derive(Default)]
pub struct PushRegistry {
    adapters: HashMap<String, Arc<dyn PushAdapter>>,
}

impl PushRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn PushAdapter>) {
        self.adapters.insert(adapter.harness().to_string(), adapter);
    }

    pub fn get(&self, harness: &str) -> Option<Arc<dyn PushAdapter>> {
        self.adapters.get(harness).cloned()
    }

    /// Dispatch one push to the adapter registered for `harness`. Unknown
    /// harness is an error; a disabled adapter is a silent skip.
    pub async fn dispatch(
        &self,
        harness: &str,
        session_id: &str,
        recipient: &str,
        message: &Message,
    ) -> Result<(), PushError> {
        let adapter = self
            .adapters
            .get(harness)
            .ok_or_else(|| PushError::UnknownHarness(harness.to_string()))?;
        if !adapter.enabled() {
            debug!(harness = %harness, "push adapter disabled, skipping");
            return Ok(());
        }
        adapter.push(session_id, recipient, message).await
    }

    /// Try every enabled adapter in name order, stopping at the first
    /// error.
    pub async fn broadcast_push(
        &self,
        session_id: &str,
        recipient: &str,
        message: &Message,
    ) -> Result<(), PushError> {
        let mut names: Vec<&String> = self.adapters.keys().collect();
        names.sort();
        for name in names {
            if let Some(adapter) = self.adapters.get(name) {
                if adapter.enabled() {
                    adapter.push(session_id, recipient, message).await?;
                }
            }
        }
        Ok(())
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
