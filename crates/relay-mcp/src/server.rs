// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! [`RelayMcpServer`] — the rmcp [`ServerHandler`] implementation.
//!
//! Wraps the relay [`ToolRegistry`] and implements the MCP `tools/list`
//! and `tools/call` protocol methods; all other MCP lifecycle methods use
//! the rmcp defaults. When serving over the streamable HTTP transport the
//! request parts are available in the request extensions, and their
//! headers are forwarded to the tools so the session resolver can
//! auto-bind.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    ErrorData as McpError,
};
use uuid::Uuid;

use relay_tools::{ToolCall, ToolRegistry};

use crate::bridge::{output_to_call_result, schema_to_mcp_tool};

#[derive(Clone)]
pub struct RelayMcpServer {
    registry: Arc<ToolRegistry>,
}

impl RelayMcpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

/// Lowercased request headers when the transport provides them (HTTP);
/// empty over stdio.
fn headers_from_context(context: &RequestContext<RoleServer>) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    if let Some(parts) = context.extensions.get::<http::request::Parts>() {
        for (name, value) in parts.headers.iter() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), v.to_string());
            }
        }
    }
    headers
}

impl ServerHandler for RelayMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..ServerInfo::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let registry = self.registry.clone();
        async move {
            let tools = registry
                .schemas()
                .into_iter()
                .map(schema_to_mcp_tool)
                .collect();
            Ok(ListToolsResult {
                tools,
                next_cursor: None,
                meta: None,
            })
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(|m| serde_json::Value::Object(m.into_iter().collect()))
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let call = ToolCall {
            id: Uuid::new_v4().to_string(),
            name: request.name.to_string(),
            args,
            headers: headers_from_context(&context),
        };

        let output = self.registry.execute(&call).await;
        Ok(output_to_call_result(output))
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
//
// The parts testable without a live transport or RequestContext. Full
// list_tools / call_tool round-trips are covered by the workspace
// integration tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_server() -> RelayMcpServer {
        RelayMcpServer::new(Arc::new(ToolRegistry::new()))
    }

    #[test]
    fn get_info_enables_tools_capability() {
        let info = empty_server().get_info();
        assert!(
            info.capabilities.tools.is_some(),
            "tools capability must be enabled"
        );
    }

    #[test]
    fn get_info_has_no_resources_capability() {
        let info = empty_server().get_info();
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn server_is_cloneable() {
        let server = empty_server();
        let _clone = server.clone();
    }
}
