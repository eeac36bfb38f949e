// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! `relay-mcp` — MCP (Model Context Protocol) server for the relay broker.
//!
//! Exposes the broker tools to any MCP-compatible harness (opencode,
//! Claude Code, codex, Cursor, etc.) over **stdio** or **streamable
//! HTTP**.
//!
//! # Quick start
//!
//! ```text
//! relay-mesh serve            # stdio, one client
//! relay-mesh serve --http     # HTTP on 127.0.0.1:18808/mcp, many clients
//! ```
//!
//! # MCP client configuration (`mcp.json`)
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "relay-mesh": {
//!       "command": "relay-mesh",
//!       "args": ["serve"]
//!     }
//!   }
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! MCP client (opencode, Claude Code, codex, …)
//!       │  stdio or streamable HTTP
//!       ▼
//! RelayMcpServer (rmcp ServerHandler)
//!       │
//!       ▼
//! ToolRegistry  ──►  Tool::execute()  ──►  Broker / PushRegistry
//! ```

pub mod bridge;
pub mod server;

pub use server::RelayMcpServer;

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use tracing::info;

use relay_tools::ToolRegistry;

/// Serve the registry on `stdin`/`stdout`, blocking until the client
/// disconnects or the process is terminated.
pub async fn serve_stdio(registry: Arc<ToolRegistry>) -> Result<()> {
    let server = RelayMcpServer::new(registry);
    let running = server
        .serve((tokio::io::stdin(), tokio::io::stdout()))
        .await
        .map_err(|e| anyhow::anyhow!("MCP server init error: {e}"))?;
    running
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))?;
    Ok(())
}

/// Serve the registry over streamable HTTP at `http://{addr}{path}`,
/// blocking until the listener fails or the process is terminated.
pub async fn serve_http(registry: Arc<ToolRegistry>, addr: &str, path: &str) -> Result<()> {
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    };

    let service = StreamableHttpService::new(
        move || Ok(RelayMcpServer::new(registry.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new().nest_service(path, service);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, path = %path, "MCP HTTP server listening");
    axum::serve(listener, router)
        .await
        .context("serving MCP over HTTP")?;
    Ok(())
}
