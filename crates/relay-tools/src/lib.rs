// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! `relay-tools` — the fixed tool surface agents see.
//!
//! Every broker operation is exposed as a [`Tool`] with a JSON Schema,
//! strict argument validation (integers arrive as strings and are parsed
//! with explicit bounds), and a compact JSON result. The tools are
//! registered in a [`ToolRegistry`] and dispatched by name; the registry
//! is what the MCP server serves.
//!
//! Tools hold their dependencies through a shared [`ToolContext`]: the
//! broker, the push-adapter registry, and the session resolver used for
//! auto-binding.

pub mod args;
pub mod builtin;
pub mod context;
pub mod registry;
pub mod session;
pub mod tool;

pub use builtin::{build_registry, DEFAULT_TOOL_NAMES};
pub use context::ToolContext;
pub use registry::{ToolRegistry, ToolSchema};
pub use session::{SessionResolver, SESSION_HEADER_CANDIDATES};
pub use tool::{Tool, ToolCall, ToolOutput};

#[cfg(test)]
pub(crate) mod testutil;
