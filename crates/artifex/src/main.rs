// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Artifex - queued image generation across multiple providers.
//!
//! Binary entry point: loads configuration, initializes logging, and
//! dispatches to the subcommand implementations.

mod generate;
mod providers;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Artifex - queued image generation across multiple providers.
#[derive(Parser, Debug)]
#[command(name = "artifex", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate images from a prompt and optional reference images.
    Generate(generate::GenerateArgs),
    /// List supported providers and their models.
    Providers,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // `providers` needs no credentials; handle it before config validation.
    if matches!(cli.command, Some(Commands::Providers)) {
        providers::run();
        return;
    }

    let config = match artifex_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            artifex_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.generation.log_level.clone())),
        )
        .init();

    match cli.command {
        Some(Commands::Generate(args)) => {
            if let Err(e) = generate::run(&config, args).await {
                eprintln!("artifex: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Providers) => unreachable!("handled above"),
        None => {
            println!("artifex: use --help for available commands");
        }
    }
}
