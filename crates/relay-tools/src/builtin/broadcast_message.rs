// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use relay_broker::{BroadcastFilter, DEFAULT_BROADCAST_LIMIT};

use crate::args::{limit_arg, optional_str, require_str};
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct BroadcastMessageTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for BroadcastMessageTool {
    fn name(&self) -> &str {
        "broadcast_message"
    }

    fn description(&self) -> &str {
        "Send one message to every agent matching the filter, best matches\n\
         first, excluding yourself. Returns the envelopes actually sent; a\n\
         mid-fanout failure stops the broadcast and reports the partial\n\
         result."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "from": { "type": "string", "description": "Sender agent id" },
                "body": { "type": "string", "description": "Message text" },
                "query": { "type": "string", "description": "Free-text recipient filter" },
                "project": { "type": "string", "description": "Require a fuzzy project match" },
                "role": { "type": "string", "description": "Require a fuzzy role match" },
                "specialization": { "type": "string", "description": "Require a fuzzy specialization match" },
                "max": {
                    "type": "string",
                    "description": "Maximum recipients (default 20, max 100)"
                }
            },
            "required": ["from", "body"],
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
    let body = require_str(call, "body")?;
    let filter = BroadcastFilter {
        query: optional_str(call, "query").unwrap_or_default(),
        project: optional_str(call, "project").unwrap_or_default(),
        role: optional_str(call, "role").unwrap_or_default(),
        specialization: optional_str(call, "specialization").unwrap_or_default(),
        limit: limit_arg(call, "max", DEFAULT_BROADCAST_LIMIT, 100)?,
    };

    let outcome = ctx
        .broker
        .broadcast(&from, &body, &filter)
        .await
        .map_err(|e| e.to_string())?;

    for message in &outcome.messages {
        ctx.dispatch_push(message);
    }

    let status = if outcome.error.is_some() {
        "error"
    } else if outcome.messages.is_empty() {
        "warning"
    } else {
        "ok"
    };
    let mut value = json!({
        "status": status,
        "recipients": outcome.messages.len(),
        "messages": outcome.messages,
    });
    if outcome.messages.is_empty() && outcome.error.is_none() {
        value["hint"] = json!(
            "no agents matched the filter; loosen the query or wait for teammates to register"
        );
    }
    if let Some(err) = &outcome.error {
        value["error"] = json!(err.to_string());
    }
    Ok(value)
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{call, context, parse, register};

    #[tokio::test]
    async fn broadcast_to_role_filtered_targets() {
        let ctx = context();
        let lead = register(&ctx, "civitas", "lead", "coordination").await;
        let backend = register(&ctx, "civitas", "backend engineer", "go").await;
        let frontend = register(&ctx, "civitas", "frontend engineer", "react").await;
        let tool = BroadcastMessageTool { ctx: ctx.clone() };

        let v = parse(
            &tool
                .execute(&call(
                    "broadcast_message",
                    json!({"from": lead, "body": "sync", "project": "civitas", "role": "backend"}),
                ))
                .await,
        );
        assert_eq!(v["status"], "ok");
        assert_eq!(v["recipients"], 1);
        assert_eq!(v["messages"][0]["to"], backend.as_str());
        assert_eq!(ctx.broker.unread_count(&frontend).unwrap(), 0);
    }

    #[tokio::test]
    async fn zero_recipients_is_a_warning_with_hint() {
        let ctx = context();
        let only = register(&ctx, "p", "r", "s").await;
        let tool = BroadcastMessageTool { ctx };
        let v = parse(
            &tool
                .execute(&call(
                    "broadcast_message",
                    json!({"from": only, "body": "anyone?"}),
                ))
                .await,
        );
        assert_eq!(v["status"], "warning");
        assert_eq!(v["recipients"], 0);
        assert!(v["hint"].as_str().unwrap().contains("no agents matched"));
    }

    #[tokio::test]
    async fn unknown_sender_is_error() {
        let ctx = context();
        register(&ctx, "p", "r", "s").await;
        let tool = BroadcastMessageTool { ctx };
        let out = tool
            .execute(&call(
                "broadcast_message",
                json!({"from": "ag-missing", "body": "x"}),
            ))
            .await;
        assert!(out.is_error);
        assert!(out.content.contains("sender agent not found"));
    }

    #[tokio::test]
    async fn unfiltered_broadcast_reaches_everyone_else() {
        let ctx = context();
        let sender = register(&ctx, "p", "r", "s").await;
        register(&ctx, "p", "r", "s").await;
        register(&ctx, "p", "r", "s").await;
        let tool = BroadcastMessageTool { ctx: ctx.clone() };
        let v = parse(
            &tool
                .execute(&call(
                    "broadcast_message",
                    json!({"from": sender, "body": "hello all"}),
                ))
                .await,
        );
        assert_eq!(v["recipients"], 2);
        assert_eq!(ctx.broker.unread_count(&sender).unwrap(), 0);
    }
}
