// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::args::{int_arg, require_str};
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct WaitForAgentsTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for WaitForAgentsTool {
    fn name(&self) -> &str {
        "wait_for_agents"
    }

    fn description(&self) -> &str {
        "Block until at least min_count agents are registered for the\n\
         project, polling every two seconds, or until the timeout elapses.\n\
         Returns the final team snapshot either way."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project": { "type": "string", "description": "Project to watch" },
                "min_count": {
                    "type": "string",
                    "description": "How many agents to wait for (default 2)"
                },
                "timeout_seconds": {
                    "type": "string",
                    "description": "Give up after this many seconds (default 60, max 600)"
                }
            },
            "required": ["project"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        match run(&self.ctx, call).await {
            Ok(value) => ToolOutput::json(&call.id, &value),
            Err(msg) => ToolOutput::err(&call.id, msg),
        }
    }
}

async fn run(ctx: &Arc<ToolContext>, call: &ToolCall) -> Result<Value, String> {
    let project = require_str(call, "project")?;
    let min_count = int_arg(call, "min_count", 2, 0, 100)? as usize;
    let timeout_seconds = int_arg(call, "timeout_seconds", 60, 0, 600)? as u64;

    let (met, rows) = ctx
        .broker
        .wait_for_agents(&project, min_count, Duration::from_secs(timeout_seconds))
        .await;
    Ok(json!({
        "met": met,
        "count": rows.len(),
        "agents": rows,
    }))
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
