// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use relay_broker::DEFAULT_FETCH_LIMIT;

use crate::args::{limit_arg, require_str};
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct FetchMessagesTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for FetchMessagesTool {
    fn name(&self) -> &str {
        "fetch_messages"
    }

    fn description(&self) -> &str {
        "Drain unread messages from your inbox, oldest first. Fetched\n\
         messages are removed from the queue; use fetch_message_history to\n\
         re-read older traffic."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "agent_id": { "type": "string", "description": "Your agent id" },
                "max": {
                    "type": "string",
                    "description": "Maximum messages to drain (default 10)"
                }
            },
            "required": ["agent_id"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        match run(&self.ctx, call) {
            Ok(value) => ToolOutput::json(&call.id, &value),
            Err(msg) => ToolOutput::err(&call.id, msg),
        }
    }
}

fn run(ctx: &Arc<ToolContext>, call: &ToolCall) -> Result<Value, String> {
    let agent_id = require_str(call, "agent_id")?;
    let max = limit_arg(call, "max", DEFAULT_FETCH_LIMIT, 1000)?;
    let result = ctx.broker.fetch(&agent_id, max).map_err(|e| e.to_string())?;
    Ok(json!({
        "messages": result.messages,
        "count": result.messages.len(),
        "remaining": result.remaining,
    }))
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{call, context, parse, register};

    #[tokio::test]
    async fn drains_fifo_and_reports_remaining() {
        let ctx = context();
        let a = register(&ctx, "p", "r", "s").await;
        let b = register(&ctx, "p", "r", "s").await;
        for i in 0..3 {
            ctx.broker.send(&a, &b, &format!("m{i}")).await.unwrap();
        }
        let tool = FetchMessagesTool { ctx };

        let v = parse(
            &tool
                .execute(&call("fetch_messages", json!({"agent_id": b, "max": "2"})))
                .await,
        );
        assert_eq!(v["count"], 2);
        assert_eq!(v["remaining"], 1);
        assert_eq!(v["messages"][0]["body"], "m0");
        assert_eq!(v["messages"][1]["body"], "m1");

        let rest = parse(&tool.execute(&call("fetch_messages", json!({"agent_id": b}))).await);
        assert_eq!(rest["count"], 1);
        assert_eq!(rest["remaining"], 0);
    }

    #[tokio::test]
    async fn empty_inbox_fetches_nothing() {
        let ctx = context();
        let a = register(&ctx, "p", "r", "s").await;
        let tool = FetchMessagesTool { ctx };
        let v = parse(&tool.execute(&call("fetch_messages", json!({"agent_id": a}))).await);
        assert_eq!(v["count"], 0);
        assert_eq!(v["messages"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn zero_max_uses_default() {
        let ctx = context();
        let a = register(&ctx, "p", "r", "s").await;
        let b = register(&ctx, "p", "r", "s").await;
        for i in 0..12 {
            ctx.broker.send(&a, &b, &format!("m{i}")).await.unwrap();
        }
        let tool = FetchMessagesTool { ctx };
        let v = parse(
            &tool
                .execute(&call("fetch_messages", json!({"agent_id": b, "max": "0"})))
                .await,
        );
        assert_eq!(v["count"], 10);
        assert_eq!(v["remaining"], 2);
    }

    #[tokio::test]
    async fn unknown_agent_is_error() {
        let ctx = context();
        let tool = FetchMessagesTool { ctx };
        let out = tool
            .execute(&call("fetch_messages", json!({"agent_id": "ag-missing"})))
            .await;
        assert!(out.is_error);
        assert!(out.content.contains("agent not found"));
    }
}
