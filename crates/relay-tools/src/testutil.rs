// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Shared helpers for the builtin tool tests: a context backed by the
//! in-memory transport and no push adapters.

use std::sync::Arc;
use std::time::Duration;

use relay_broker::{AgentProfile, Broker};
use relay_push::PushRegistry;
use relay_transport::MemoryTransport;

use crate::context::ToolContext;
use crate::session::SessionResolver;
use crate::tool::{ToolCall, ToolOutput};

pub fn context() -> Arc<ToolContext> {
    let transport = Arc::new(MemoryTransport::new());
    Arc::new(ToolContext {
        broker: Arc::new(Broker::new(transport)),
        push: Arc::new(PushRegistry::new()),
        resolver: SessionResolver::new("", 15, Duration::from_secs(1)),
    })
}

pub async fn register(
    ctx: &Arc<ToolContext>,
    project: &str,
    role: &str,
    specialization: &str,
) -> String {
    ctx.broker
        .register_agent(AgentProfile {
            description: "test agent".to_string(),
            project: project.to_string(),
            role: role.to_string(),
            specialization: specialization.to_string(),
            ..AgentProfile::default()
        })
        .await
        .unwrap()
}

pub fn call(name: &str, args: serde_json::Value) -> ToolCall {
    ToolCall::new("t1", name, args)
}

pub fn parse(out: &ToolOutput) -> serde_json::Value {
    assert!(!out.is_error, "unexpected tool error: {}", out.content);
    serde_json::from_str(&out.content).unwrap()
}
