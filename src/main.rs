// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! assetflow - Static site asset pipeline

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assetflow::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose {
        "assetflow=debug"
    } else {
        "assetflow=info"
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Change to specified directory if provided
    if let Some(ref dir) = args.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    let globals = args.globals();

    // Dispatch to command handlers
    match args.command.unwrap_or_default() {
        Commands::Build { parallel } => cli::build::run(&globals, parallel).await,
        Commands::Serve { port, no_open } => cli::serve::run(&globals, port, no_open).await,
        Commands::Graph {
            composition,
            format,
        } => cli::graph::run(&globals, composition, format).await,
        Commands::Validate => cli::validate::run(&globals).await,
        Commands::Init => cli::init::run(&globals).await,
        command => match command.task() {
            Some(task) => cli::task::run(&globals, task).await,
            None => Err(miette::miette!("Unhandled command: {:?}", command)),
        },
    }
}
