// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use relay_broker::normalize_project;

use crate::args::{optional_str, require_str};
use crate::context::ToolContext;
use crate::tool::{Tool, ToolCall, ToolOutput};

pub struct SharedContextTool {
    pub ctx: Arc<ToolContext>,
}

#[async_trait]
impl Tool for SharedContextTool {
    fn name(&self) -> &str {
        "shared_context"
    }

    fn description(&self) -> &str {
        "Small per-project key/value store for out-of-band coordination\n\
         (file paths, API prefixes, port numbers). action=set stores a\n\
         value (empty value deletes the key), action=get reads one key,\n\
         action=list returns every entry for the project."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "description": "One of set | get | list"
                },
                "project": { "type": "string", "description": "Project the entry belongs to" },
                "key": { "type": "string", "description": "Entry key (set/get)" },
                "value": {
                    "type": "string",
                    "description": "Value to store; empty deletes the key (set only)"
                }
            },
            "required": ["action", "project"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        match run(&self.ctx, call) {
            Ok(value) => ToolOutput::json(&call.id, &value),
            Err(msg) => ToolOutput::err(&call.id, msg),
        }
    }
}

fn run(ctx: &Arc<ToolContext>, call: &ToolCall) -> Result<Value, String> {
    let action = require_str(call, "action")?;
    let project = require_str(call, "project")?;
    let normalized = normalize_project(&project);

    match action.as_str() {
        "set" => {
            let key = require_str(call, "key")?;
            let value = optional_str(call, "value").unwrap_or_default();
            let stored = ctx
                .broker
                .shared_context_set(&project, &key, &value)
                .map_err(|e| e.to_string())?;
            Ok(match stored {
                Some(v) => json!({
                    "action": "set",
                    "project": normalized,
                    "key": key,
                    "value": v,
                }),
                None => json!({
                    "action": "set",
                    "project": normalized,
                    "key": key,
                    "deleted": true,
                }),
            })
        }
        "get" => {
            let key = require_str(call, "key")?;
            match ctx
                .broker
                .shared_context_get(&project, &key)
                .map_err(|e| e.to_string())?
            {
                Some(value) => Ok(json!({
                    "action": "get",
                    "project": normalized,
                    "key": key,
                    "value": value,
                })),
                None => Err(format!("context key not found: {key}")),
            }
        }
        "list" => {
            let entries = ctx
                .broker
                .shared_context_list(&project)
                .map_err(|e| e.to_string())?;
            Ok(json!({
                "action": "list",
                "project": normalized,
                "entries": entries,
            }))
        }
        other => Err(format!("unknown shared_context action: {other:?}")),
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
