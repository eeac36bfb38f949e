// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::args::require_str;
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct SendMessageTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for SendMessageTool {
    fn name(&self) -> &str {
        "send_message"
    }

    fn description(&self) -> &str {
        "Send a point-to-point message to another agent. The message is\n\
         durably persisted and lands in the recipient's inbox; if the\n\
         recipient has a bound session it is also push-notified."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "from": { "type": "string", "description": "Sender agent id" },
                "to": { "type": "string", "description": "Recipient agent id" },
                "body": { "type": "string", "description": "Message text" }
            },
            "required": ["from", "to", "body"],
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
    let from = require_str(call, "from")?;
    let to = require_str(call, "to")?;
    let body = require_str(call, "body")?;

    let message = ctx
        .broker
        .send(&from, &to, &body)
        .await
        .map_err(|e| e.to_string())?;
    let recipient_unread = ctx.broker.unread_count(&to).unwrap_or(0);

    ctx.dispatch_push(&message);

    let mut value =
        serde_json::to_value(&message).map_err(|e| format!("encoding result: {e}"))?;
    value["recipient_unread"] = json!(recipient_unread);
    Ok(value)
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
