// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(
    name = "relay-mesh",
    version,
    about = "Local MCP message broker for coordinating autonomous coding agents"
)]
pub struct Cli {
    /// Explicit config file (merged on top of the discovered layers)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the broker and serve the MCP tool surface (the default)
    Serve {
        /// Serve over streamable HTTP instead of stdio
        #[arg(long)]
        http: bool,

        /// Comma-separated subset of tools to expose (default: all)
        #[arg(long)]
        tools: Option<String>,
    },

    /// Print the merged configuration as YAML and exit
    ShowConfig,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["relay-mesh"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn serve_with_http_flag() {
        let cli = Cli::try_parse_from(["relay-mesh", "serve", "--http"]).unwrap();
        match cli.command {
            Some(Commands::Serve { http, tools }) => {
                assert!(http);
                assert!(tools.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn serve_with_tool_subset() {
        let cli =
            Cli::try_parse_from(["relay-mesh", "serve", "--tools", "send_message,fetch_messages"])
                .unwrap();
        match cli.command {
            Some(Commands::Serve { tools, .. }) => {
                assert_eq!(tools.as_deref(), Some("send_message,fetch_messages"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn unknown_subcommand_is_usage_error() {
        assert!(Cli::try_parse_from(["relay-mesh", "frobnicate"]).is_err());
    }

    #[test]
    fn verbosity_accumulates() {
        let cli = Cli::try_parse_from(["relay-mesh", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
