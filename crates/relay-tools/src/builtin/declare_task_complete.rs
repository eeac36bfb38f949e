// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::args::{optional_str, require_str};
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct DeclareTaskCompleteTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for DeclareTaskCompleteTool {
    fn name(&self) -> &str {
        "declare_task_complete"
    }

    fn description(&self) -> &str {
        "Mark your task as finished: forces status to done so\n\
         check_project_readiness can observe completion. Optionally attach\n\
         a short summary for teammates."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "agent_id": { "type": "string", "description": "Your agent id" },
                "summary": {
                    "type": "string",
                    "description": "One-line description of what was accomplished (optional)"
                }
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
        if let Err(e) = self.ctx.broker.declare_done(&agent_id) {
            return ToolOutput::err(&call.id, e.to_string());
        }
        let mut value = json!({
            "ok": true,
            "agent_id": agent_id,
            "status": "done",
        });
        if let Some(summary) = optional_str(call, "summary") {
            value["summary"] = json!(summary);
        }
        ToolOutput::json(&call.id, &value)
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
