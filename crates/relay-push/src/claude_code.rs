// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! State-file adapter for the claude-code harness.
//!
//! claude-code has no prompt-injection endpoint, so pending messages are
//! parked in a JSON file the harness-side hook reads on its next turn.
//! Writes are atomic: serialize to a temp file in the same directory,
//! sync, rename over the target. A corrupted file reads as empty and is
//! recovered by the next write. A desktop notification is fired
//! concurrently, best effort.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use relay_broker::Message;

use crate::{PushAdapter, PushError};

/// Well-known file name under the state directory.
pub const PENDING_FILE: &str = "pending-messages.json";

/// One queued notification, as the harness-side hook consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRecord {
    pub session_id: String,
    pub recipient: String,
    pub message_id: String,
    pub from: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub pushed_at: DateTime<Utc>,
}

pub struct ClaudeCodeAdapter {
    state_dir: PathBuf,
    notify_command: Option<String>,
}

impl ClaudeCodeAdapter {
    pub fn new(state_dir: PathBuf, notify_command: Option<String>) -> Self {
        Self {
            state_dir,
            notify_command,
        }
    }

    fn pending_path(&self) -> PathBuf {
        self.state_dir.join(PENDING_FILE)
    }

    /// Current file contents; corruption reads as empty.
    pub fn read_pending(path: &Path) -> Vec<PendingRecord> {
        match std::fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    fn append_pending(&self, record: PendingRecord) -> Result<(), PushError> {
        std::fs::create_dir_all(&self.state_dir)
            .map_err(|e| PushError::StateFile(format!("creating state dir: {e}")))?;

        let path = self.pending_path();
        let mut records = Self::read_pending(&path);
        records.push(record);

        let data = serde_json::to_vec_pretty(&records)
            .map_err(|e| PushError::StateFile(format!("encoding records: {e}")))?;

        // Temp file in the same directory so the rename stays on one
        // filesystem and is atomic.
        let tmp = self
            .state_dir
            .join(format!(".{PENDING_FILE}.{}.tmp", std::process::id()));
        {
            let mut file = std::fs::File::create(&tmp)
                .map_err(|e| PushError::StateFile(format!("creating temp file: {e}")))?;
            file.write_all(&data)
                .map_err(|e| PushError::StateFile(format!("writing temp file: {e}")))?;
            file.sync_all()
                .map_err(|e| PushError::StateFile(format!("syncing temp file: {e}")))?;
        }
        std::fs::rename(&tmp, &path)
            .map_err(|e| PushError::StateFile(format!("renaming into place: {e}")))?;
        Ok(())
    }

    /// Fire a desktop notification. Spawn failures (no notify command on
    /// this machine) are logged and ignored.
    fn notify(&self, message: &Message) {
        let command = self.notify_command.as_deref().unwrap_or("notify-send");
        if command.is_empty() {
            return;
        }
        let result = std::process::Command::new(command)
            .arg("relay-mesh")
            .arg(format!("New message from {}", message.from))
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn();
        if let Err(err) = result {
            debug!(command = %command, error = %err, "desktop notification failed");
        }
    }
}

#[async_trait]
impl PushAdapter for ClaudeCodeAdapter {
    fn harness(&self) -> &str {
        "claude-code"
    }

    /// The state file needs no external service.
    fn enabled(&self) -> bool {
        true
    }

    async fn push(
        &self,
        session_id: &str,
        recipient: &str,
        message: &Message,
    ) -> Result<(), PushError> {
        self.append_pending(PendingRecord {
            session_id: session_id.to_string(),
            recipient: recipient.to_string(),
            message_id: message.id.clone(),
            from: message.from.clone(),
            body: message.body.clone(),
            created_at: message.created_at,
            pushed_at: Utc::now(),
        })?;
        self.notify(message);
        Ok(())
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
