// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! Conversions between the relay tool types and rmcp's MCP model types.
//!
//! Schemas travel one way (registry → `tools/list`), outputs the other
//! (`tools/call` → client). Successful outputs are already compact JSON
//! documents and pass through as text; errors leave here wrapped in the
//! `{"error": ...}` envelope the wire contract prescribes.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject, Tool as McpTool};
use serde_json::{json, Value};
use tracing::warn;

use relay_tools::{ToolOutput, ToolSchema};

/// Build the rmcp descriptor advertised for one registry entry.
pub fn schema_to_mcp_tool(schema: ToolSchema) -> McpTool {
    let input_schema = Arc::new(input_schema_object(&schema.name, schema.parameters));
    McpTool::new(
        Cow::Owned(schema.name),
        Cow::Owned(schema.description),
        input_schema,
    )
}

/// Every relay tool declares `{"type": "object", ...}` parameters, and MCP
/// requires an object here. A tool that produced anything else is
/// misdeclared: log it and expose a closed empty object instead of leaking
/// the stray value onto the wire.
fn input_schema_object(tool: &str, params: Value) -> JsonObject {
    match params {
        Value::Object(map) => map,
        other => {
            warn!(tool = %tool, schema = %other, "non-object parameter schema, advertising a closed empty object");
            let mut map = JsonObject::new();
            map.insert("type".to_string(), Value::String("object".to_string()));
            map.insert("additionalProperties".to_string(), Value::Bool(false));
            map
        }
    }
}

/// Convert a [`ToolOutput`] into an rmcp [`CallToolResult`].
pub fn output_to_call_result(output: ToolOutput) -> CallToolResult {
    if output.is_error {
        let envelope = json!({ "error": output.content.trim() }).to_string();
        CallToolResult {
            content: vec![Content::text(envelope)],
            is_error: Some(true),
            structured_content: None,
            meta: None,
        }
    } else {
        CallToolResult::success(vec![Content::text(output.content)])
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
