// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! Shared argument parsing for the tool surface. Every helper returns a
//! single-line message on failure, which the caller wraps into an error
//! output unchanged.
//!
//! Integer-valued inputs arrive as strings on the wire; numbers are
//! accepted too, for clients that send proper JSON integers anyway.

use serde_json::Value;

use crate::tool::ToolCall;

/// A required, non-empty-after-trim string argument.
pub fn require_str(call: &ToolCall, key: &str) -> Result<String, String> {
    match call.args.get(key).and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(format!("missing required parameter '{key}'")),
    }
}

/// An optional string argument; blank values read as absent.
pub fn optional_str(call: &ToolCall, key: &str) -> Option<String> {
    call.args
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// An integer argument with explicit bounds. Absent or blank yields
/// `default`.
pub fn int_arg(
    call: &ToolCall,
    key: &str,
    default: i64,
    min: i64,
    max: i64,
) -> Result<i64, String> {
    let parsed = match call.args.get(key) {
        None | Some(Value::Null) => return Ok(default),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(default),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid integer for '{key}': {:?}", s.trim()))?,
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| format!("invalid integer for '{key}'"))?,
        Some(_) => return Err(format!("invalid integer for '{key}'")),
    };
    if parsed < min || parsed > max {
        return Err(format!("'{key}' must be between {min} and {max}"));
    }
    Ok(parsed)
}

/// A result-count limit: values at or below zero fall back to `default`,
/// values above `cap` are rejected.
pub fn limit_arg(call: &ToolCall, key: &str, default: usize, cap: i64) -> Result<usize, String> {
    let value = int_arg(call, key, 0, i64::MIN, cap)?;
    if value <= 0 {
        Ok(default)
    } else {
        Ok(value as usize)
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
