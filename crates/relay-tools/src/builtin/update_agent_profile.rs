// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use relay_broker::{AgentStatus, ProfilePatch};

use crate::args::{optional_str, require_str};
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct UpdateAgentProfileTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for UpdateAgentProfileTool {
    fn name(&self) -> &str {
        "update_agent_profile"
    }

    fn description(&self) -> &str {
        "Update fields of an agent's profile. Only the fields you pass are\n\
         changed; blank values are ignored. Use status to move through\n\
         idle -> working -> blocked -> done."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "agent_id": { "type": "string", "description": "Agent to update" },
                "name": { "type": "string" },
                "description": { "type": "string" },
                "project": { "type": "string" },
                "role": { "type": "string" },
                "specialization": { "type": "string" },
                "github": { "type": "string" },
                "branch": { "type": "string" },
                "status": {
                    "type": "string",
                    "description": "One of idle | working | blocked | done"
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
    let status = match optional_str(call, "status") {
        Some(s) => Some(AgentStatus::parse(&s).ok_or_else(|| format!("unknown status: {s:?}"))?),
        None => None,
    };
    let patch = ProfilePatch {
        name: optional_str(call, "name"),
        description: optional_str(call, "description"),
        project: optional_str(call, "project"),
        role: optional_str(call, "role"),
        specialization: optional_str(call, "specialization"),
        github: optional_str(call, "github"),
        branch: optional_str(call, "branch"),
        status,
    };
    let snapshot = ctx
        .broker
        .update_profile(&agent_id, &patch)
        .map_err(|e| e.to_string())?;
    serde_json::to_value(snapshot).map_err(|e| format!("encoding result: {e}"))
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{call, context, parse, register};

    #[tokio::test]
    async fn updates_only_given_fields() {
        let ctx = context();
        let id = register(&ctx, "civitas", "backend engineer", "go").await;
        let tool = UpdateAgentProfileTool { ctx };
        let v = parse(
            &tool
                .execute(&call(
                    "update_agent_profile",
                    json!({"agent_id": id, "specialization": "distributed-systems"}),
                ))
                .await,
        );
        assert_eq!(v["specialization"], "distributed-systems");
        assert_eq!(v["role"], "backend engineer");
        assert_eq!(v["status"], "idle");
        assert!(v["last_seen"].is_string());
    }

    #[tokio::test]
    async fn status_transition_via_patch() {
        let ctx = context();
        let id = register(&ctx, "p", "r", "s").await;
        let tool = UpdateAgentProfileTool { ctx };
        let v = parse(
            &tool
                .execute(&call(
                    "update_agent_profile",
                    json!({"agent_id": id, "status": "working"}),
                ))
                .await,
        );
        assert_eq!(v["status"], "working");
    }

    #[tokio::test]
    async fn bad_status_is_rejected() {
        let ctx = context();
        let id = register(&ctx, "p", "r", "s").await;
        let tool = UpdateAgentProfileTool { ctx };
        let out = tool
            .execute(&call(
                "update_agent_profile",
                json!({"agent_id": id, "status": "sleeping"}),
            ))
            .await;
        assert!(out.is_error);
        assert!(out.content.contains("unknown status"));
    }

    #[tokio::test]
    async fn unknown_agent_is_error() {
        let ctx = context();
        let tool = UpdateAgentProfileTool { ctx };
        let out = tool
            .execute(&call(
                "update_agent_profile",
                json!({"agent_id": "ag-missing", "role": "x"}),
            ))
            .await;
        assert!(out.is_error);
        assert!(out.content.contains("agent not found"));
    }

    #[tokio::test]
    async fn project_patch_is_normalized() {
        let ctx = context();
        let id = register(&ctx, "p", "r", "s").await;
        let tool = UpdateAgentProfileTool { ctx };
        let v = parse(
            &tool
                .execute(&call(
                    "update_agent_profile",
                    json!({"agent_id": id, "project": "New Project"}),
                ))
                .await,
        );
        assert_eq!(v["project"], "new-project");
    }
}
