// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use relay_broker::DEFAULT_FIND_LIMIT;
use relay_discovery::Filter;

use crate::args::{limit_arg, optional_str};
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct FindAgentsTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for FindAgentsTool {
    fn name(&self) -> &str {
        "find_agents"
    }

    fn description(&self) -> &str {
        "Fuzzy-search registered agents. project/role/specialization are hard\n\
         filters; query is free text matched across all profile fields.\n\
         Results are ranked best-first and deterministic."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Free-text search across name, description, project, role, specialization, github, branch"
                },
                "project": { "type": "string", "description": "Require a fuzzy project match" },
                "role": { "type": "string", "description": "Require a fuzzy role match" },
                "specialization": { "type": "string", "description": "Require a fuzzy specialization match" },
                "max": {
                    "type": "string",
                    "description": "Maximum results (default 20, max 100)"
                }
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let max = match limit_arg(call, "max", DEFAULT_FIND_LIMIT, 100) {
            Ok(v) => v,
            Err(msg) => return ToolOutput::err(&call.id, msg),
        };
        let filter = Filter {
            query: optional_str(call, "query").unwrap_or_default(),
            project: optional_str(call, "project").unwrap_or_default(),
            role: optional_str(call, "role").unwrap_or_default(),
            specialization: optional_str(call, "specialization").unwrap_or_default(),
        };
        ToolOutput::json(&call.id, &self.ctx.broker.find_agents(&filter, max))
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{call, context, parse, register};

    #[tokio::test]
    async fn filters_by_role() {
        let ctx = context();
        let _backend = register(&ctx, "civitas", "backend engineer", "go").await;
        let frontend = register(&ctx, "civitas", "frontend engineer", "react").await;
        let tool = FindAgentsTool { ctx };
        let v = parse(
            &tool
                .execute(&call("find_agents", json!({"role": "frontend engineer"})))
                .await,
        );
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["id"], frontend.as_str());
    }

    #[tokio::test]
    async fn empty_filter_returns_everyone() {
        let ctx = context();
        register(&ctx, "p", "r", "s").await;
        register(&ctx, "p", "r", "s").await;
        let tool = FindAgentsTool { ctx };
        let v = parse(&tool.execute(&call("find_agents", json!({}))).await);
        assert_eq!(v.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn max_accepts_string_integers() {
        let ctx = context();
        for _ in 0..3 {
            register(&ctx, "p", "r", "s").await;
        }
        let tool = FindAgentsTool { ctx };
        let v = parse(&tool.execute(&call("find_agents", json!({"max": "2"}))).await);
        assert_eq!(v.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn bad_max_is_invalid_argument() {
        let ctx = context();
        let tool = FindAgentsTool { ctx };
        let out = tool
            .execute(&call("find_agents", json!({"max": "many"})))
            .await;
        assert!(out.is_error);
        assert!(out.content.contains("invalid integer"));
    }

    #[tokio::test]
    async fn no_match_returns_empty_array() {
        let ctx = context();
        register(&ctx, "civitas", "backend engineer", "go").await;
        let tool = FindAgentsTool { ctx };
        let v = parse(
            &tool
                .execute(&call("find_agents", json!({"query": "quantum cryptography"})))
                .await,
        );
        assert_eq!(v.as_array().unwrap().len(), 0);
    }
}
