// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::args::require_str;
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct GetSessionBindingTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for GetSessionBindingTool {
    fn name(&self) -> &str {
        "get_session_binding"
    }

    fn description(&self) -> &str {
        "Look up which harness session, if any, an agent is bound to."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "agent_id": { "type": "string", "description": "Agent to inspect" }
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
        match self.ctx.broker.session_binding(&agent_id) {
            Ok((session_id, harness)) => ToolOutput::json(
                &call.id,
                &json!({
                    "agent_id": agent_id,
                    "session_id": session_id,
                    "harness": harness.map(|h| h.as_str()),
                }),
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
    use relay_broker::Harness;

    #[tokio::test]
    async fn unbound_agent_reports_nulls() {
        let ctx = context();
        let id = register(&ctx, "p", "r", "s").await;
        let tool = GetSessionBindingTool { ctx };
        let v = parse(
            &tool
                .execute(&call("get_session_binding", json!({"agent_id": id})))
                .await,
        );
        assert!(v["session_id"].is_null());
        assert!(v["harness"].is_null());
    }

    #[tokio::test]
    async fn bound_agent_reports_binding() {
        let ctx = context();
        let id = register(&ctx, "p", "r", "s").await;
        ctx.broker
            .bind_session(&id, "sess-1", Some(Harness::ClaudeCode))
            .unwrap();
        let tool = GetSessionBindingTool { ctx };
        let v = parse(
            &tool
                .execute(&call("get_session_binding", json!({"agent_id": id})))
                .await,
        );
        assert_eq!(v["session_id"], "sess-1");
        assert_eq!(v["harness"], "claude-code");
    }

    #[tokio::test]
    async fn unknown_agent_is_error() {
        let ctx = context();
        let tool = GetSessionBindingTool { ctx };
        let out = tool
            .execute(&call("get_session_binding", json!({"agent_id": "ag-x"})))
            .await;
        assert!(out.is_error);
    }
}
