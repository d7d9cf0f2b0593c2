// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Pidwatch CLI
//!
//! Command-line host for the pidwatch control endpoint.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// Pidwatch - control endpoint for the monitored process ID
#[derive(Parser)]
#[command(name = "pidwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (built-in defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Host the control endpoint on a Unix socket until Ctrl+C
    Serve,

    /// Read the currently monitored PID
    Get {
        /// Socket path override
        #[arg(short, long)]
        socket: Option<PathBuf>,
    },

    /// Update the monitored PID (requires administrative capability)
    Set {
        /// New PID, e.g. 1234
        value: String,

        /// Socket path override
        #[arg(short, long)]
        socket: Option<PathBuf>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Serve => commands::serve::execute(cli.config.as_deref()).await,
        Commands::Get { socket } => commands::get::execute(cli.config.as_deref(), socket).await,
        Commands::Set { value, socket } => {
            commands::set::execute(cli.config.as_deref(), socket, &value).await
        }
        Commands::Validate { file } => commands::validate::execute(&file).await,
    }
}
