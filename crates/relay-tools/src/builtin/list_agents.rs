// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct ListAgentsTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for ListAgentsTool {
    fn name(&self) -> &str {
        "list_agents"
    }

    fn description(&self) -> &str {
        "List every registered agent with its full profile, status, last_seen\n\
         and unread message count. For targeted lookups use find_agents."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        ToolOutput::json(&call.id, &self.ctx.broker.list_agents())
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
