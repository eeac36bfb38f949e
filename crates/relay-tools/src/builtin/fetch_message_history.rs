// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use relay_broker::DEFAULT_HISTORY_LIMIT;

use crate::args::{limit_arg, require_str};
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct FetchMessageHistoryTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for FetchMessageHistoryTool {
    fn name(&self) -> &str {
        "fetch_message_history"
    }

    fn description(&self) -> &str {
        "Read past messages addressed to an agent back out of the durable\n\
         stream, oldest first. Works across broker restarts; does not touch\n\
         the unread queue."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "agent_id": { "type": "string", "description": "Recipient agent id" },
                "max": {
                    "type": "string",
                    "description": "Maximum messages to return (default 20)"
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
    let max = limit_arg(call, "max", DEFAULT_HISTORY_LIMIT, 1000)?;
    let history = ctx
        .broker
        .fetch_history(&agent_id, max)
        .await
        .map_err(|e| e.to_string())?;
    Ok(json!(history))
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{call, context, parse, register};

    #[tokio::test]
    async fn history_is_oldest_first() {
        let ctx = context();
        let a = register(&ctx, "p", "r", "s").await;
        let b = register(&ctx, "p", "r", "s").await;
        for i in 0..3 {
            ctx.broker.send(&a, &b, &format!("m{i}")).await.unwrap();
        }
        // Drain the queue; history must still return everything.
        ctx.broker.fetch(&b, 100).unwrap();

        let tool = FetchMessageHistoryTool { ctx };
        let v = parse(
            &tool
                .execute(&call("fetch_message_history", json!({"agent_id": b})))
                .await,
        );
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr[0]["body"], "m0");
        assert_eq!(arr[2]["body"], "m2");
    }

    #[tokio::test]
    async fn empty_stream_returns_empty_array() {
        let ctx = context();
        let a = register(&ctx, "p", "r", "s").await;
        let tool = FetchMessageHistoryTool { ctx };
        let v = parse(
            &tool
                .execute(&call("fetch_message_history", json!({"agent_id": a})))
                .await,
        );
        assert_eq!(v.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn max_bounds_the_result() {
        let ctx = context();
        let a = register(&ctx, "p", "r", "s").await;
        let b = register(&ctx, "p", "r", "s").await;
        for i in 0..5 {
            ctx.broker.send(&a, &b, &format!("m{i}")).await.unwrap();
        }
        let tool = FetchMessageHistoryTool { ctx };
        let v = parse(
            &tool
                .execute(&call(
                    "fetch_message_history",
                    json!({"agent_id": b, "max": "2"}),
                ))
                .await,
        );
        let arr = v.as_array().unwrap();
        // Newest two, oldest first.
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["body"], "m3");
        assert_eq!(arr[1]["body"], "m4");
    }
}
