// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::args::require_str;
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct HeartbeatAgentTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for HeartbeatAgentTool {
    fn name(&self) -> &str {
        "heartbeat_agent"
    }

    fn description(&self) -> &str {
        "Refresh an agent's last_seen timestamp so it survives stale-agent\n\
         pruning during long stretches without sends or fetches."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "agent_id": { "type": "string", "description": "Your agent id" }
            },
            "required": ["agent_id"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let agent_id = match require_str(call, "agent_id") {
            Ok(v) => v,
            Err(msg) => return ToolOutput::err(&call.id, msg),
        };
        match self.ctx.broker.heartbeat(&agent_id) {
            Ok(last_seen) => ToolOutput::json(
                &call.id,
                &json!({ "agent_id": agent_id, "last_seen": last_seen }),
            ),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
