// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// A single tool invocation as dispatched by the MCP server.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Opaque identifier, forwarded verbatim into the output.
    pub id: String,
    pub name: String,
    /// Parsed JSON arguments.
    pub args: Value,
    /// Transport request headers (lowercase names). Empty over stdio; the
    /// session resolver reads these for auto-binding.
    pub headers: HashMap<String, String>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args,
            headers: HashMap::new(),
        }
    }
}

/// The result of executing a tool: a compact JSON document on success, a
/// single-line message on error.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub call_id: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn err(call_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: msg.into(),
            is_error: true,
        }
    }

    /// Serialize `value` as the success payload.
    pub fn json<T: Serialize>(call_id: impl Into<String>, value: &T) -> Self {
        let call_id = call_id.into();
        match serde_json::to_string(value) {
            Ok(body) => Self::ok(call_id, body),
            Err(e) => Self::err(call_id, format!("encoding result: {e}")),
        }
    }
}

/// Trait every broker tool implements.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON Schema for parameters.
    fn parameters_schema(&self) -> Value;
    /// Execute the tool. Errors are wrapped in [`ToolOutput::err`].
    async fn execute(&self, call: &ToolCall) -> ToolOutput;
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
