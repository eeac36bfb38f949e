// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// How the broker is exposed to MCP clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServeMode {
    /// Line-delimited JSON-RPC over stdin/stdout. One client per process.
    #[default]
    Stdio,
    /// Streamable HTTP on the configured bind address. Many clients.
    Http,
}

/// Which message transport backs the broker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportBackend {
    /// NATS JetStream — durable stream, survives broker restarts.
    #[default]
    Nats,
    /// In-process transport. No durability; for tests and offline use.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default)]
    pub backend: TransportBackend,
    /// NATS server URL. Ignored for the memory backend.
    #[serde(default = "default_nats_url")]
    pub url: String,
    /// Name of the JetStream stream covering all agent subjects.
    #[serde(default = "default_stream_name")]
    pub stream: String,
    /// Stream retention window in days.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Serve transport. `relay-mesh serve --http` overrides this to Http.
    #[serde(default)]
    pub mode: ServeMode,
    /// Bind address for HTTP mode.
    #[serde(default = "default_http_addr")]
    pub addr: String,
    /// URL path the MCP endpoint is mounted on.
    #[serde(default = "default_http_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Base URL of the opencode server, e.g. `http://127.0.0.1:4096`.
    /// Empty disables the opencode prompt-injection adapter.
    #[serde(default)]
    pub opencode_base_url: String,
    /// Timeout applied to every push HTTP request.
    #[serde(default = "default_push_timeout")]
    pub timeout_secs: u64,
    /// Suppress the "reply with send_message" instruction in injected prompts.
    #[serde(default)]
    pub no_reply: bool,
    /// Directory the state-file adapter writes pending messages into.
    /// Defaults to `~/.relay-mesh` when unset.
    #[serde(default)]
    pub state_dir: Option<std::path::PathBuf>,
    /// Override for the desktop notification command (default `notify-send`).
    #[serde(default)]
    pub notify_command: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// How far back the session resolver looks for a recently active
    /// unbound session when auto-binding.
    #[serde(default = "default_auto_bind_window")]
    pub auto_bind_window_mins: u64,
    /// Remove agents whose last_seen is older than this. 0 disables the sweep.
    #[serde(default)]
    pub prune_after_mins: u64,
}

fn default_nats_url() -> String {
    "nats://127.0.0.1:4222".to_string()
}

fn default_stream_name() -> String {
    "RELAY_MESSAGES".to_string()
}

fn default_max_age_days() -> u64 {
    7
}

fn default_http_addr() -> String {
    "127.0.0.1:18808".to_string()
}

fn default_http_path() -> String {
    "/mcp".to_string()
}

fn default_push_timeout() -> u64 {
    15
}

fn default_auto_bind_window() -> u64 {
    15
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            backend: TransportBackend::default(),
            url: default_nats_url(),
            stream: default_stream_name(),
            max_age_days: default_max_age_days(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            mode: ServeMode::default(),
            addr: default_http_addr(),
            path: default_http_path(),
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            opencode_base_url: String::new(),
            timeout_secs: default_push_timeout(),
            no_reply: false,
            state_dir: None,
            notify_command: None,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            auto_bind_window_mins: default_auto_bind_window(),
            prune_after_mins: 0,
        }
    }
}

impl PushConfig {
    /// Effective state directory for the state-file adapter.
    pub fn effective_state_dir(&self) -> std::path::PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| std::path::PathBuf::from("."))
                .join(".relay-mesh")
        })
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
