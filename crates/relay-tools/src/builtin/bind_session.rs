// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use relay_broker::Harness;

use crate::args::{optional_str, require_str};
use crate::context::ToolContext;
use crate::session::SessionResolver;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct BindSessionTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for BindSessionTool {
    fn name(&self) -> &str {
        "bind_session"
    }

    fn description(&self) -> &str {
        "Bind a harness session to an agent so incoming messages can be\n\
         push-notified. The session id is auto-detected from request\n\
         headers or the harness when omitted."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "agent_id": { "type": "string", "description": "Agent to bind" },
                "session_id": {
                    "type": "string",
                    "description": "Harness session id (auto-detected when omitted)"
                },
                "harness": {
                    "type": "string",
                    "description": "One of opencode | claude-code | codex | generic"
                }
            },
            "required": ["agent_id"],
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
    let agent_id = require_str(call, "agent_id")?;
    let session_id = match optional_str(call, "session_id") {
        Some(sid) => sid,
        None => ctx
            .resolver
            .resolve_session(&call.headers, &ctx.broker.bound_sessions())
            .await
            .ok_or_else(|| "session id required".to_string())?,
    };

    // Explicit harness wins; otherwise keep what the agent already has, and
    // only fall back to environment inference for a first-time binding.
    let harness = match optional_str(call, "harness") {
        Some(h) => Some(Harness::parse(&h).ok_or_else(|| format!("unknown harness: {h:?}"))?),
        None => {
            let (_, existing) = ctx
                .broker
                .session_binding(&agent_id)
                .map_err(|e| e.to_string())?;
            match existing {
                Some(_) => None,
                None => Some(SessionResolver::harness_from_env()),
            }
        }
    };

    ctx.broker
        .bind_session(&agent_id, &session_id, harness)
        .map_err(|e| e.to_string())?;
    let (bound_session, bound_harness) = ctx
        .broker
        .session_binding(&agent_id)
        .map_err(|e| e.to_string())?;
    Ok(json!({
        "agent_id": agent_id,
        "session_id": bound_session,
        "harness": bound_harness.map(|h| h.as_str()),
    }))
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
