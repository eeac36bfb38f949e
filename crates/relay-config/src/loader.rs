// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! Layered configuration loading.
//!
//! Layers are applied lowest to highest priority: system, user, workspace,
//! then an explicit `--config` path, then environment variables. Each tier
//! names two candidate files (`.yaml` and `.yml`); only the first one that
//! exists is read — the spellings shadow each other rather than merging.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::{Config, ServeMode, TransportBackend};

/// Candidate files per priority tier, lowest tier first.
fn layer_candidates() -> Vec<Vec<PathBuf>> {
    let mut tiers: Vec<Vec<PathBuf>> = Vec::new();

    // System-wide
    tiers.push(vec![
        PathBuf::from("/etc/relay-mesh/config.yaml"),
        PathBuf::from("/etc/relay-mesh/config.yml"),
    ]);

    // Per-user
    if let Some(dir) = dirs::config_dir() {
        tiers.push(vec![
            dir.join("relay-mesh/config.yaml"),
            dir.join("relay-mesh/config.yml"),
        ]);
    }
    if let Some(home) = dirs::home_dir() {
        tiers.push(vec![
            home.join(".relay-mesh/config.yaml"),
            home.join(".relay-mesh/config.yml"),
        ]);
    }

    // Workspace-local, highest discovered tier
    tiers.push(vec![
        PathBuf::from(".relay-mesh.yaml"),
        PathBuf::from(".relay-mesh.yml"),
    ]);

    tiers
}

/// The first candidate that exists on disk, if any.
fn first_existing(candidates: &[PathBuf]) -> Option<&PathBuf> {
    candidates.iter().find(|path| path.is_file())
}

fn read_yaml(path: &Path) -> anyhow::Result<serde_yaml::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Load configuration: overlay every discovered tier, then the explicit
/// `extra` path (e.g. `--config`, which must exist), then the environment.
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = serde_yaml::Value::Null;
    let mut any_layer = false;

    for tier in layer_candidates() {
        if let Some(path) = first_existing(&tier) {
            debug!(path = %path.display(), "applying config layer");
            overlay(&mut merged, read_yaml(path)?);
            any_layer = true;
        }
    }

    if let Some(path) = extra {
        debug!(path = %path.display(), "applying explicit config");
        overlay(&mut merged, read_yaml(path)?);
        any_layer = true;
    }

    let mut config: Config = if any_layer {
        serde_yaml::from_value(merged).unwrap_or_default()
    } else {
        Config::default()
    };

    apply_env(&mut config);
    Ok(config)
}

/// Apply `layer` on top of `base`. Mappings are merged key by key; any
/// other value (scalars, sequences, null) replaces whatever the base held,
/// so a layer can also swap a whole section out.
fn overlay(base: &mut serde_yaml::Value, layer: serde_yaml::Value) {
    use serde_yaml::Value;

    match layer {
        Value::Mapping(entries) => {
            let Value::Mapping(target) = base else {
                *base = Value::Mapping(entries);
                return;
            };
            for (key, value) in entries {
                if target.contains_key(&key) {
                    if let Some(slot) = target.get_mut(&key) {
                        overlay(slot, value);
                    }
                } else {
                    target.insert(key, value);
                }
            }
        }
        other => *base = other,
    }
}

/// Environment overrides win over every file layer.
fn apply_env(config: &mut Config) {
    if let Ok(url) = std::env::var("RELAY_NATS_URL") {
        if !url.is_empty() {
            config.transport.url = url;
        }
    }
    if let Ok(backend) = std::env::var("RELAY_TRANSPORT") {
        match backend.as_str() {
            "nats" => config.transport.backend = TransportBackend::Nats,
            "memory" => config.transport.backend = TransportBackend::Memory,
            _ => {}
        }
    }
    if let Ok(mode) = std::env::var("RELAY_SERVE_MODE") {
        match mode.as_str() {
            "stdio" => config.http.mode = ServeMode::Stdio,
            "http" => config.http.mode = ServeMode::Http,
            _ => {}
        }
    }
    if let Ok(addr) = std::env::var("RELAY_HTTP_ADDR") {
        if !addr.is_empty() {
            config.http.addr = addr;
        }
    }
    if let Ok(path) = std::env::var("RELAY_HTTP_PATH") {
        if !path.is_empty() {
            config.http.path = path;
        }
    }
    if let Ok(url) = std::env::var("RELAY_OPENCODE_URL") {
        config.push.opencode_base_url = url;
    }
    if let Ok(secs) = std::env::var("RELAY_PUSH_TIMEOUT_SECS") {
        if let Ok(v) = secs.parse() {
            config.push.timeout_secs = v;
        }
    }
    if let Ok(v) = std::env::var("RELAY_NO_REPLY") {
        config.push.no_reply = v == "1" || v.eq_ignore_ascii_case("true");
    }
    if let Ok(dir) = std::env::var("RELAY_STATE_DIR") {
        if !dir.is_empty() {
            config.push.state_dir = Some(PathBuf::from(dir));
        }
    }
    if let Ok(mins) = std::env::var("RELAY_AUTO_BIND_WINDOW_MINS") {
        if let Ok(v) = mins.parse() {
            config.registry.auto_bind_window_mins = v;
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
