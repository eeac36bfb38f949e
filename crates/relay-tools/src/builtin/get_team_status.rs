// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::args::optional_str;
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct GetTeamStatusTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for GetTeamStatusTool {
    fn name(&self) -> &str {
        "get_team_status"
    }

    fn description(&self) -> &str {
        "Snapshot of every agent's status, last_seen, last_fetch and unread\n\
         count, optionally narrowed to one project."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project": {
                    "type": "string",
                    "description": "Only agents whose project matches (optional)"
                }
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let project = optional_str(call, "project");
        let rows = self.ctx.broker.team_status(project.as_deref());
        ToolOutput::json(&call.id, &rows)
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{call, context, parse, register};

    #[tokio::test]
    async fn reports_all_agents_without_filter() {
        let ctx = context();
        register(&ctx, "civitas", "backend", "go").await;
        register(&ctx, "atlantis", "frontend", "react").await;
        let tool = GetTeamStatusTool { ctx };
        let v = parse(&tool.execute(&call("get_team_status", json!({}))).await);
        assert_eq!(v.as_array().unwrap().len(), 2);
        assert_eq!(v[0]["status"], "idle");
        assert_eq!(v[0]["unread_messages"], 0);
    }

    #[tokio::test]
    async fn project_filter_narrows_rows() {
        let ctx = context();
        register(&ctx, "civitas", "backend", "go").await;
        register(&ctx, "atlantis", "frontend", "react").await;
        let tool = GetTeamStatusTool { ctx };
        let v = parse(
            &tool
                .execute(&call("get_team_status", json!({"project": "civitas"})))
                .await,
        );
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["project"], "civitas");
    }

    #[tokio::test]
    async fn unread_counts_are_live() {
        let ctx = context();
        let a = register(&ctx, "p", "r", "s").await;
        let b = register(&ctx, "p", "r", "s").await;
        ctx.broker.send(&a, &b, "ping").await.unwrap();
        let tool = GetTeamStatusTool { ctx };
        let v = parse(&tool.execute(&call("get_team_status", json!({}))).await);
        let row = v
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["id"] == b.as_str())
            .unwrap();
        assert_eq!(row["unread_messages"], 1);
    }
}
