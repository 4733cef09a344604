// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Init command - write the default configuration and source layout

use colored::Colorize;
use miette::Result;

use super::GlobalOptions;
use crate::config::{BuildConfig, CONFIG_FILES};
use crate::errors::AssetflowError;
use crate::utils::print_success;

const HEADER: &str = "\
# assetflow configuration
#
# Every key is optional; delete what you don't change.
# Set NODE_ENV=prod (or pass --env prod) for a production build.

";

/// Run the init command
pub async fn run(globals: &GlobalOptions) -> Result<()> {
    let root = globals.root()?;

    println!("{}", "Initializing assetflow project...".bold());
    println!();

    if let Some(existing) = CONFIG_FILES.iter().find(|name| root.join(name).exists()) {
        return Err(miette::miette!(
            "{} already exists; remove it first to start over",
            existing
        ));
    }

    let config = BuildConfig::default();
    let target = root.join(CONFIG_FILES[0]);
    let content = format!("{}{}", HEADER, config.to_yaml()?);
    std::fs::write(&target, content).map_err(|e| AssetflowError::write(&target, e))?;
    print_success(&format!("Created {}", CONFIG_FILES[0]));

    let dirs = [
        config.partials_dir(),
        config.paths.src.join("scss"),
        config.paths.src.join("js"),
        config.paths.src.join("images"),
    ];
    for dir in dirs {
        let full = root.join(&dir);
        if !full.exists() {
            std::fs::create_dir_all(&full).map_err(|e| AssetflowError::write(&full, e))?;
            print_success(&format!("Created {}/", dir.display()));
        }
    }

    println!();
    println!("{}", "Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Add pages to {}", "src/".cyan());
    println!("  2. Run {} to build into {}", "assetflow".cyan(), "dist/".cyan());
    println!("  3. Run {} for live reload", "assetflow serve".cyan());
    println!();

    Ok(())
}
