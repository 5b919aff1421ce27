// Copyright 2026 ixmap Contributors
// SPDX-License-Identifier: MIT

//! ixmap command-line entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use ixmap::config::{Config, Overrides};
use ixmap::logging;

#[derive(Parser)]
#[command(
    name = "ixmap",
    about = "Write a network's PeeringDB exchange addresses to a text map",
    version,
    after_help = "With no options, fetches Netflix's PeeringDB page and writes nf_ix_map.txt.\nIXMAP_URL, IXMAP_OUTPUT and IXMAP_TIMEOUT_SECS are read when the matching flag is absent."
)]
struct Cli {
    /// Page to fetch.
    #[arg(long)]
    url: Option<String>,

    /// File to write the map to (fully replaced).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// User-Agent header to send.
    #[arg(long)]
    user_agent: Option<String>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            output: self.output.clone(),
            timeout_secs: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "ixmap", &mut std::io::stdout());
        return Ok(());
    }

    logging::init(&cli.log_level).context("failed to initialize logging")?;

    let config = match Config::resolve(cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    // Failures are already logged by the pipeline; only the exit code is left.
    match ixmap::run(&config).await {
        Ok(summary) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            Ok(())
        }
        Err(e) => std::process::exit(e.exit_code()),
    }
}
