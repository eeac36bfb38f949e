// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! The fixed operation table. One module per tool; [`build_registry`]
//! assembles them all, optionally restricted to a comma-separated subset
//! (`--tools register_agent,send_message,...`).

pub mod bind_session;
pub mod broadcast_message;
pub mod check_project_readiness;
pub mod declare_task_complete;
pub mod fetch_message_history;
pub mod fetch_messages;
pub mod find_agents;
pub mod get_message_status;
pub mod get_session_binding;
pub mod get_team_status;
pub mod heartbeat_agent;
pub mod list_agents;
pub mod register_agent;
pub mod send_message;
pub mod shared_context;
pub mod update_agent_profile;
pub mod wait_for_agents;

use std::sync::Arc;

use crate::context::ToolContext;
use crate::registry::ToolRegistry;

/// Names of every broker tool, sorted. This list mirrors each tool's
/// `Tool::name()` exactly.
pub const DEFAULT_TOOL_NAMES: &[&str] = &[
    "bind_session",
    "broadcast_message",
    "check_project_readiness",
    "declare_task_complete",
    "fetch_message_history",
    "fetch_messages",
    "find_agents",
    "get_message_status",
    "get_session_binding",
    "get_team_status",
    "heartbeat_agent",
    "list_agents",
    "register_agent",
    "send_message",
    "shared_context",
    "update_agent_profile",
    "wait_for_agents",
];

/// Build a [`ToolRegistry`] with the full tool table.
///
/// `allowed_names` is an optional comma-separated subset; `"all"` (or
/// `None`) includes everything. Unknown names are silently ignored.
pub fn build_registry(ctx: Arc<ToolContext>, allowed_names: Option<&str>) -> ToolRegistry {
    let filter: Option<std::collections::HashSet<&str>> = match allowed_names {
        None | Some("all") => None,
        Some(list) => Some(list.split(',').map(|s| s.trim()).collect()),
    };

    let allow = |name: &str| -> bool {
        match &filter {
            None => true,
            Some(set) => set.contains(name),
        }
    };

    let mut reg = ToolRegistry::new();

    if allow("bind_session") {
        reg.register(bind_session::BindSessionTool { ctx: ctx.clone() });
    }
    if allow("broadcast_message") {
        reg.register(broadcast_message::BroadcastMessageTool { ctx: ctx.clone() });
    }
    if allow("check_project_readiness") {
        reg.register(check_project_readiness::CheckProjectReadinessTool { ctx: ctx.clone() });
    }
    if allow("declare_task_complete") {
        reg.register(declare_task_complete::DeclareTaskCompleteTool { ctx: ctx.clone() });
    }
    if allow("fetch_message_history") {
        reg.register(fetch_message_history::FetchMessageHistoryTool { ctx: ctx.clone() });
    }
    if allow("fetch_messages") {
        reg.register(fetch_messages::FetchMessagesTool { ctx: ctx.clone() });
    }
    if allow("find_agents") {
        reg.register(find_agents::FindAgentsTool { ctx: ctx.clone() });
    }
    if allow("get_message_status") {
        reg.register(get_message_status::GetMessageStatusTool { ctx: ctx.clone() });
    }
    if allow("get_session_binding") {
        reg.register(get_session_binding::GetSessionBindingTool { ctx: ctx.clone() });
    }
    if allow("get_team_status") {
        reg.register(get_team_status::GetTeamStatusTool { ctx: ctx.clone() });
    }
    if allow("heartbeat_agent") {
        reg.register(heartbeat_agent::HeartbeatAgentTool { ctx: ctx.clone() });
    }
    if allow("list_agents") {
        reg.register(list_agents::ListAgentsTool { ctx: ctx.clone() });
    }
    if allow("register_agent") {
        reg.register(register_agent::RegisterAgentTool { ctx: ctx.clone() });
    }
    if allow("send_message") {
        reg.register(send_message::SendMessageTool { ctx: ctx.clone() });
    }
    if allow("shared_context") {
        reg.register(shared_context::SharedContextTool { ctx: ctx.clone() });
    }
    if allow("update_agent_profile") {
        reg.register(update_agent_profile::UpdateAgentProfileTool { ctx: ctx.clone() });
    }
    if allow("wait_for_agents") {
        reg.register(wait_for_agents::WaitForAgentsTool { ctx });
    }

    reg
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[test]
    fn default_registry_contains_all_tools() {
        let reg = build_registry(testutil::context(), None);
        let names = reg.names();
        for expected in DEFAULT_TOOL_NAMES {
            assert!(
                names.iter().any(|n| n == expected),
                "expected tool {expected:?}, got: {names:?}"
            );
        }
        assert_eq!(names.len(), DEFAULT_TOOL_NAMES.len());
    }

    #[test]
    fn allowed_names_filter_restricts_tools() {
        let reg = build_registry(testutil::context(), Some("send_message,fetch_messages"));
        assert_eq!(reg.names(), vec!["fetch_messages", "send_message"]);
    }

    #[test]
    fn all_keyword_includes_everything() {
        let reg = build_registry(testutil::context(), Some("all"));
        assert_eq!(reg.names().len(), DEFAULT_TOOL_NAMES.len());
    }

    #[test]
    fn unknown_names_are_ignored() {
        let reg = build_registry(testutil::context(), Some("send_message,rm_rf"));
        assert_eq!(reg.names(), vec!["send_message"]);
    }

    #[test]
    fn default_tool_names_constant_is_sorted() {
        let mut sorted = DEFAULT_TOOL_NAMES.to_vec();
        sorted.sort_unstable();
        assert_eq!(DEFAULT_TOOL_NAMES, sorted.as_slice());
    }

    #[test]
    fn every_schema_is_an_object() {
        let reg = build_registry(testutil::context(), None);
        for schema in reg.schemas() {
            assert!(schema.parameters.is_object(), "{} schema", schema.name);
            assert!(!schema.description.is_empty(), "{} description", schema.name);
        }
    }
}
