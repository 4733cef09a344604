// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Validate command - check the project configuration

use colored::Colorize;
use miette::Result;

use super::GlobalOptions;
use crate::config::{BuildConfig, ConfigValidator, CONFIG_FILES};
use crate::graph::{Composition, DagBuilder};
use crate::utils::{print_error, print_section, print_success, print_warning};

/// Run the validate command
pub async fn run(globals: &GlobalOptions) -> Result<()> {
    println!("{}", "Validating configuration...".bold());
    println!();

    let root = globals.root()?;
    let source = match &globals.config {
        Some(path) => Some(path.display().to_string()),
        None => CONFIG_FILES
            .iter()
            .find(|name| root.join(name).exists())
            .map(|name| name.to_string()),
    };

    let config = match BuildConfig::load(&root, globals.config.as_deref()) {
        Ok(config) => config.with_mode(globals.mode()),
        Err(e) => {
            eprintln!("  {} Failed to load configuration", "✗".red());
            eprintln!();
            return Err(e.into());
        }
    };

    match &source {
        Some(name) => print_success(&format!("{} parsed", name)),
        None => print_success("No config file, using defaults"),
    }

    for composition in [Composition::build(), Composition::serve()] {
        DagBuilder::build(&composition)?;
    }
    print_success("Task graphs are acyclic");

    let validation = ConfigValidator::validate(&config);
    let missing = ConfigValidator::validate_files(&config, &root);

    if !validation.errors.is_empty() {
        println!();
        println!("{}:", "Errors".red().bold());
        for error in &validation.errors {
            print_error(error);
        }
    }

    if !missing.is_empty() {
        println!();
        println!("{}:", "Missing directories".yellow().bold());
        for path in &missing {
            print_warning(path);
        }
    }

    if validation.has_warnings() {
        println!();
        println!("{}:", "Warnings".yellow().bold());
        for warning in &validation.warnings {
            print_warning(warning);
        }
    }

    if globals.verbose {
        print_section("Summary");
        println!("  Mode: {}", config.mode);
        println!(
            "  Paths: {} → {}",
            config.paths.src.display(),
            config.paths.dest.display()
        );
        println!("  Vendor entries: {}", config.vendor.len());
        for binding in &config.watch.bindings {
            let reload = if binding.reload { " + reload" } else { "" };
            println!(
                "    - {} → {}{}",
                binding.pattern,
                binding.task,
                reload.dimmed()
            );
        }
    }

    println!();

    if !validation.is_valid() {
        return Err(miette::miette!("Configuration validation failed"));
    }

    if missing.is_empty() && !validation.has_warnings() {
        println!("{}", "Configuration is valid!".green().bold());
    } else {
        println!(
            "{}",
            "Configuration is valid but has warnings.".yellow().bold()
        );
    }

    Ok(())
}
