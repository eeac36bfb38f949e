// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! HTTP prompt-injection adapter for the opencode harness.
//!
//! The notification itself is a prompt posted into the recipient's session
//! (`POST {base}/session/{id}/prompt_async`, expected 204). A TUI toast is
//! raised afterwards on a best-effort basis: the adapter first asks the
//! server for the session's working directory so the toast reaches the
//! right TUI instance, then posts to `{base}/tui/show-toast`. Toast
//! failures are logged and ignored.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use relay_broker::Message;

use crate::{PushAdapter, PushError};

pub struct OpencodeAdapter {
    base_url: String,
    client: reqwest::Client,
    no_reply: bool,
}

impl OpencodeAdapter {
    /// `base_url` empty disables the adapter.
    pub fn new(base_url: &str, timeout: Duration, no_reply: bool) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PushError::Http(format!("building http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            no_reply,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The prompt injected into the recipient's session.
    fn format_prompt(recipient: &str, message: &Message, no_reply: bool) -> String {
        let mut prompt = format!(
            "New relay-mesh message from {} ({}):\n\n{}",
            message.from, message.id, message.body
        );
        if !no_reply {
            prompt.push_str(&format!(
                "\n\nReply with send_message(from=\"{recipient}\", to=\"{}\", body=...).",
                message.from
            ));
        }
        prompt
    }

    /// Best-effort TUI toast. Queries the session for its working directory
    /// first so multi-instance setups route the toast correctly.
    async fn show_toast(&self, session_id: &str, message: &Message) {
        let directory = match self
            .client
            .get(self.endpoint(&format!("/session/{session_id}")))
            .send()
            .await
        {
            Ok(resp) => resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("directory").and_then(|d| d.as_str()).map(String::from)),
            Err(err) => {
                debug!(error = %err, "session lookup for toast failed");
                None
            }
        };

        let mut request = self
            .client
            .post(self.endpoint("/tui/show-toast"))
            .json(&json!({
                "title": "relay-mesh",
                "message": format!("New message from {}", message.from),
                "variant": "info",
            }));
        if let Some(dir) = directory {
            request = request.query(&[("directory", dir)]);
        }
        if let Err(err) = request.send().await {
            debug!(error = %err, "show-toast failed");
        }
    }
}

#[async_trait]
impl PushAdapter for OpencodeAdapter {
    fn harness(&self) -> &str {
        "opencode"
    }

    fn enabled(&self) -> bool {
        !self.base_url.is_empty()
    }

    async fn push(
        &self,
        session_id: &str,
        recipient: &str,
        message: &Message,
    ) -> Result<(), PushError> {
        let prompt = Self::format_prompt(recipient, message, self.no_reply);
        let url = self.endpoint(&format!("/session/{session_id}/prompt_async"));
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "parts": [{ "type": "text", "text": prompt }],
            }))
            .send()
            .await
            .map_err(|e| PushError::Http(e.to_string()))?;

        if response.status() != reqwest::StatusCode::NO_CONTENT {
            return Err(PushError::Http(format!(
                "prompt_async returned {}",
                response.status()
            )));
        }

        self.show_toast(session_id, message).await;
        Ok(())
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
