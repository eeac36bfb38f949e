// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::args::require_str;
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct GetMessageStatusTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for GetMessageStatusTool {
    fn name(&self) -> &str {
        "get_message_status"
    }

    fn description(&self) -> &str {
        "Check whether a sent message is still pending in the recipient's\n\
         inbox or has been delivered (fetched). Recent traffic only: the\n\
         durable-stream scan is bounded."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message_id": { "type": "string", "description": "The msg- id to look up" }
            },
            "required": ["message_id"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let message_id = match require_str(call, "message_id") {
            Ok(v) => v,
            Err(msg) => return ToolOutput::err(&call.id, msg),
        };
        match self.ctx.broker.message_status(&message_id).await {
            Ok(state) => ToolOutput::json(
                &call.id,
                &json!({ "message_id": message_id, "status": state.as_str() }),
            ),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{call, context, parse, register};

    #[tokio::test]
    async fn pending_until_fetched_then_delivered() {
        let ctx = context();
        let a = register(&ctx, "p", "r", "s").await;
        let b = register(&ctx, "p", "r", "s").await;
        let sent = ctx.broker.send(&a, &b, "hello").await.unwrap();
        let tool = GetMessageStatusTool { ctx: ctx.clone() };

        let v = parse(
            &tool
                .execute(&call("get_message_status", json!({"message_id": sent.id})))
                .await,
        );
        assert_eq!(v["status"], "pending");

        ctx.broker.fetch(&b, 10).unwrap();
        let v = parse(
            &tool
                .execute(&call("get_message_status", json!({"message_id": sent.id})))
                .await,
        );
        assert_eq!(v["status"], "delivered");
    }

    #[tokio::test]
    async fn unknown_message_is_error() {
        let ctx = context();
        let tool = GetMessageStatusTool { ctx };
        let out = tool
            .execute(&call("get_message_status", json!({"message_id": "msg-none"})))
            .await;
        assert!(out.is_error);
        assert!(out.content.contains("message not found"));
    }
}
