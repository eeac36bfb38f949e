// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::args::require_str;
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct CheckProjectReadinessTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for CheckProjectReadinessTool {
    fn name(&self) -> &str {
        "check_project_readiness"
    }

    fn description(&self) -> &str {
        "Check whether every agent on a project has declared its task\n\
         complete. ready is true only when at least one agent carries the\n\
         project and all of them have status done."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project": { "type": "string", "description": "Project to check" }
            },
            "required": ["project"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let project = match require_str(call, "project") {
            Ok(v) => v,
            Err(msg) => return ToolOutput::err(&call.id, msg),
        };
        match self.ctx.broker.check_readiness(&project) {
            Ok(readiness) => ToolOutput::json(&call.id, &readiness),
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
    async fn empty_project_is_not_ready() {
        let ctx = context();
        let tool = CheckProjectReadinessTool { ctx };
        let v = parse(
            &tool
                .execute(&call("check_project_readiness", json!({"project": "ghost"})))
                .await,
        );
        assert_eq!(v["ready"], false);
        assert_eq!(v["total_agents"], 0);
    }

    #[tokio::test]
    async fn ready_only_when_all_done() {
        let ctx = context();
        let a = register(&ctx, "civitas", "r", "s").await;
        let b = register(&ctx, "civitas", "r", "s").await;
        let tool = CheckProjectReadinessTool { ctx: ctx.clone() };

        ctx.broker.declare_done(&a).unwrap();
        let v = parse(
            &tool
                .execute(&call("check_project_readiness", json!({"project": "civitas"})))
                .await,
        );
        assert_eq!(v["ready"], false);
        assert_eq!(v["done_count"], 1);
        assert_eq!(v["pending_agents"][0], b.as_str());

        ctx.broker.declare_done(&b).unwrap();
        let v = parse(
            &tool
                .execute(&call("check_project_readiness", json!({"project": "civitas"})))
                .await,
        );
        assert_eq!(v["ready"], true);
        assert_eq!(v["pending_agents"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn project_name_is_normalized_for_comparison() {
        let ctx = context();
        let a = register(&ctx, "My Project", "r", "s").await;
        ctx.broker.declare_done(&a).unwrap();
        let tool = CheckProjectReadinessTool { ctx };
        let v = parse(
            &tool
                .execute(&call(
                    "check_project_readiness",
                    json!({"project": "my_project"}),
                ))
                .await,
        );
        assert_eq!(v["ready"], true);
    }
}
