// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Serve command - build, watch and serve with live reload

use colored::Colorize;
use miette::Result;
use std::sync::Arc;

use super::GlobalOptions;
use crate::graph::{Composition, TaskExecutor};
use crate::reload::DevServer;
use crate::watch::WatchCoordinator;

/// Run the serve command
pub async fn run(globals: &GlobalOptions, port: Option<u16>, no_open: bool) -> Result<()> {
    let mut config = globals.load_config()?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if no_open {
        config.server.open = false;
    }

    let ctx = globals.context_with(config)?;
    let watcher = WatchCoordinator::new(Arc::clone(&ctx))?;
    let server = DevServer::new(ctx.dest(), &ctx.config.server, ctx.reloader.clone());

    println!("{}", "Starting development server...".bold());
    println!("Press {} to exit.", "Ctrl+C".cyan());

    let executor = TaskExecutor::new(globals.execution_options());
    let initial_ctx = Arc::clone(&ctx);
    let initial = tokio::spawn(async move {
        if let Err(e) = executor.execute(initial_ctx, &Composition::serve()).await {
            tracing::error!("initial build failed: {}", e);
        }
    });

    let outcome = tokio::select! {
        result = server.run() => result,
        result = watcher.run() => result,
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("{}", "Stopping.".dimmed());
            Ok(())
        }
    };

    initial.abort();
    outcome?;
    Ok(())
}
