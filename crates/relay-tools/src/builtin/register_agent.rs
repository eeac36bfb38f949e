// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use relay_broker::AgentProfile;

use crate::args::{optional_str, require_str};
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct RegisterAgentTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for RegisterAgentTool {
    fn name(&self) -> &str {
        "register_agent"
    }

    fn description(&self) -> &str {
        "Register this agent with the relay so teammates can discover and message it.\n\
         Call once at session start. When a session id can be detected (explicit\n\
         argument, request header, or a recent harness session) the agent is bound\n\
         to it and re-registration under the same session updates the existing\n\
         profile instead of creating a duplicate."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Display name (defaults to the generated agent id)"
                },
                "description": {
                    "type": "string",
                    "description": "What this agent is working on"
                },
                "project": {
                    "type": "string",
                    "description": "Project name; normalized to kebab-case"
                },
                "role": {
                    "type": "string",
                    "description": "Role within the team, e.g. 'backend engineer'"
                },
                "specialization": {
                    "type": "string",
                    "description": "Technical specialization, e.g. 'distributed-systems'"
                },
                "github": { "type": "string", "description": "GitHub handle (optional)" },
                "branch": { "type": "string", "description": "Working branch (optional)" },
                "session_id": {
                    "type": "string",
                    "description": "Harness session id for push notifications (auto-detected when omitted)"
                },
                "harness": {
                    "type": "string",
                    "description": "One of opencode | claude-code | codex | generic (auto-detected when omitted)"
                }
            },
            "required": ["description", "project", "role", "specialization"],
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
    let profile = AgentProfile {
        name: optional_str(call, "name").unwrap_or_default(),
        description: require_str(call, "description")?,
        project: require_str(call, "project")?,
        role: require_str(call, "role")?,
        specialization: require_str(call, "specialization")?,
        github: optional_str(call, "github").unwrap_or_default(),
        branch: optional_str(call, "branch").unwrap_or_default(),
        ..AgentProfile::default()
    };

    let session_id = match optional_str(call, "session_id") {
        Some(sid) => Some(sid),
        None => {
            ctx.resolver
                .resolve_session(&call.headers, &ctx.broker.bound_sessions())
                .await
        }
    };

    match session_id {
        Some(session_id) => {
            let harness = ctx
                .resolver
                .resolve_harness(optional_str(call, "harness").as_deref())?;
            let (agent_id, _created) = ctx
                .broker
                .register_or_update_by_session(&session_id, profile)
                .await
                .map_err(|e| e.to_string())?;
            ctx.broker
                .bind_session(&agent_id, &session_id, Some(harness))
                .map_err(|e| e.to_string())?;
            Ok(json!({
                "agent_id": agent_id,
                "session_id": session_id,
                "harness": harness.as_str(),
            }))
        }
        None => {
            let agent_id = ctx
                .broker
                .register_agent(profile)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({ "agent_id": agent_id }))
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{call, context, parse};

    fn args() -> Value {
        json!({
            "description": "builds the api",
            "project": "Civitas",
            "role": "backend engineer",
            "specialization": "go-backend"
        })
    }

    #[tokio::test]
    async fn registers_and_returns_agent_id() {
        let ctx = context();
        let tool = RegisterAgentTool { ctx: ctx.clone() };
        let out = tool.execute(&call("register_agent", args())).await;
        let v = parse(&out);
        let id = v["agent_id"].as_str().unwrap();
        assert!(id.starts_with("ag-"));
        assert!(v.get("session_id").is_none());
        assert_eq!(ctx.broker.list_agents().len(), 1);
        assert_eq!(ctx.broker.list_agents()[0].project, "civitas");
    }

    #[tokio::test]
    async fn missing_required_field_is_error() {
        let ctx = context();
        let tool = RegisterAgentTool { ctx };
        let out = tool
            .execute(&call("register_agent", json!({"description": "d"})))
            .await;
        assert!(out.is_error);
        assert!(out.content.contains("project"));
    }

    #[tokio::test]
    async fn explicit_session_binds_and_dedups() {
        let ctx = context();
        let tool = RegisterAgentTool { ctx: ctx.clone() };
        let mut a = args();
        a["session_id"] = json!("sess-1");
        a["harness"] = json!("claude-code");

        let first = parse(&tool.execute(&call("register_agent", a.clone())).await);
        assert_eq!(first["session_id"], "sess-1");
        assert_eq!(first["harness"], "claude-code");

        a["specialization"] = json!("new-spec");
        let second = parse(&tool.execute(&call("register_agent", a)).await);
        assert_eq!(second["agent_id"], first["agent_id"]);

        let agents = ctx.broker.list_agents();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].specialization, "new-spec");
    }

    #[tokio::test]
    async fn session_from_header_is_used() {
        let ctx = context();
        let tool = RegisterAgentTool { ctx: ctx.clone() };
        let mut c = call("register_agent", args());
        c.headers
            .insert("x-relay-session-id".to_string(), "sess-h1".to_string());
        let v = parse(&tool.execute(&c).await);
        assert_eq!(v["session_id"], "sess-h1");
        let id = v["agent_id"].as_str().unwrap();
        let (sid, _) = ctx.broker.session_binding(id).unwrap();
        assert_eq!(sid.as_deref(), Some("sess-h1"));
    }

    #[tokio::test]
    async fn unknown_harness_is_rejected() {
        let ctx = context();
        let tool = RegisterAgentTool { ctx };
        let mut a = args();
        a["session_id"] = json!("sess-1");
        a["harness"] = json!("emacs");
        let out = tool.execute(&call("register_agent", a)).await;
        assert!(out.is_error);
        assert!(out.content.contains("unknown harness"));
    }
}
