// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use relay_broker::{Broker, SUBJECT_WILDCARD};
use relay_config::{Config, ServeMode, TransportBackend};
use relay_push::{ClaudeCodeAdapter, OpencodeAdapter, PushRegistry};
use relay_tools::{SessionResolver, ToolContext};
use relay_transport::{MemoryTransport, NatsTransport, Transport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            cli::print_completions(*shell);
            return Ok(());
        }
        Some(Commands::ShowConfig) => {
            let config = relay_config::load(cli.config.as_deref())?;
            println!("{}", serde_yaml::to_string(&config).unwrap_or_default());
            return Ok(());
        }
        _ => {}
    }

    let config = relay_config::load(cli.config.as_deref())?;
    let (force_http, tools) = match cli.command {
        Some(Commands::Serve { http, tools }) => (http, tools),
        _ => (false, None),
    };
    run_serve(config, force_http, tools.as_deref()).await
}

async fn run_serve(config: Config, force_http: bool, tools: Option<&str>) -> anyhow::Result<()> {
    // ── Transport ────────────────────────────────────────────────────────────
    let transport: Arc<dyn Transport> = match config.transport.backend {
        TransportBackend::Nats => {
            let max_age = Duration::from_secs(config.transport.max_age_days * 24 * 60 * 60);
            Arc::new(
                NatsTransport::connect(
                    &config.transport.url,
                    &config.transport.stream,
                    vec![SUBJECT_WILDCARD.to_string()],
                    max_age,
                )
                .await
                .context("connecting to the message transport")?,
            )
        }
        TransportBackend::Memory => Arc::new(MemoryTransport::new()),
    };
    let broker = Arc::new(Broker::new(transport));

    // ── Push adapters ────────────────────────────────────────────────────────
    let push_timeout = Duration::from_secs(config.push.timeout_secs);
    let mut push = PushRegistry::new();
    push.register(Arc::new(
        OpencodeAdapter::new(
            &config.push.opencode_base_url,
            push_timeout,
            config.push.no_reply,
        )
        .context("initializing the opencode push adapter")?,
    ));
    push.register(Arc::new(ClaudeCodeAdapter::new(
        config.push.effective_state_dir(),
        config.push.notify_command.clone(),
    )));

    // ── Tool surface ─────────────────────────────────────────────────────────
    let resolver = SessionResolver::new(
        &config.push.opencode_base_url,
        config.registry.auto_bind_window_mins,
        push_timeout,
    );
    let ctx = Arc::new(ToolContext {
        broker: broker.clone(),
        push: Arc::new(push),
        resolver,
    });
    let registry = Arc::new(relay_tools::build_registry(ctx, tools));

    // ── Stale-agent sweep ────────────────────────────────────────────────────
    if config.registry.prune_after_mins > 0 {
        let sweeper = broker.clone();
        let max_age = Duration::from_secs(config.registry.prune_after_mins * 60);
        // Sweep at most once a minute regardless of how long the max age is.
        let period = max_age.min(Duration::from_secs(60));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = sweeper.prune_stale(max_age);
                if !removed.is_empty() {
                    info!(count = removed.len(), "pruned stale agents");
                }
            }
        });
    }

    // ── Serve ────────────────────────────────────────────────────────────────
    let mode = if force_http {
        ServeMode::Http
    } else {
        config.http.mode
    };
    let result = match mode {
        ServeMode::Stdio => relay_mcp::serve_stdio(registry).await,
        ServeMode::Http => {
            relay_mcp::serve_http(registry, &config.http.addr, &config.http.path).await
        }
    };

    let _ = broker.shutdown().await;
    result
}

fn init_logging(verbosity: u8) {
    // stdout carries the MCP wire in stdio mode; logs always go to stderr.
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
