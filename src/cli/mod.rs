// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! CLI command definitions and handlers

pub mod build;
pub mod graph;
pub mod init;
pub mod serve;
pub mod task;
pub mod validate;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{BuildConfig, BuildMode, ConfigValidator};
use crate::errors::{AssetflowError, AssetflowResult};
use crate::graph::ExecutionOptions;
use crate::tasks::{BuildContext, TaskKind};

/// Static site asset pipeline
#[derive(Parser, Debug)]
#[clap(
    name = "assetflow",
    version,
    about = "Build pages, stylesheets, scripts and images into a static site",
    long_about = None,
    after_help = "Examples:\n\
        assetflow                       Clean and build everything\n\
        assetflow serve                 Build, watch and serve with live reload\n\
        assetflow css                   Run a single task\n\
        NODE_ENV=prod assetflow         Production build\n\n\
        See 'assetflow <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: .assetflow.yaml)
    #[clap(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Build mode; only `prod` selects a production build
    #[clap(long, global = true, env = "NODE_ENV", value_name = "MODE")]
    pub env: Option<String>,
}

impl Cli {
    pub fn globals(&self) -> GlobalOptions {
        GlobalOptions {
            verbose: self.verbose,
            config: self.config.clone(),
            env: self.env.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Clean the output directory, then run every task (default)
    Build {
        /// Run independent tasks concurrently
        #[clap(long)]
        parallel: bool,
    },

    /// Build, then watch sources and serve the output with live reload
    Serve {
        /// Port to listen on
        #[clap(short, long)]
        port: Option<u16>,

        /// Don't open a browser
        #[clap(long)]
        no_open: bool,
    },

    /// Inline partials into pages
    #[clap(alias = "markup")]
    Html,

    /// Compile stylesheets
    #[clap(alias = "stylesheet")]
    Css,

    /// Bundle scripts
    #[clap(alias = "script")]
    Js,

    /// Copy images
    #[clap(alias = "images")]
    Img,

    /// Copy third-party artifacts from the dependency store
    #[clap(alias = "vendor")]
    Modules,

    /// Empty the output directory
    #[clap(alias = "del")]
    Clean,

    /// Show a composition as a graph
    Graph {
        /// Composition to show
        #[clap(value_enum, default_value = "build")]
        composition: CompositionKind,

        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: GraphFormat,
    },

    /// Validate the configuration
    Validate,

    /// Write a default .assetflow.yaml and source layout
    Init,
}

impl Commands {
    /// The task a single-task command runs
    pub fn task(&self) -> Option<TaskKind> {
        match self {
            Self::Html => Some(TaskKind::Markup),
            Self::Css => Some(TaskKind::Stylesheet),
            Self::Js => Some(TaskKind::Script),
            Self::Img => Some(TaskKind::Image),
            Self::Modules => Some(TaskKind::Vendor),
            Self::Clean => Some(TaskKind::Clean),
            _ => None,
        }
    }
}

impl Default for Commands {
    fn default() -> Self {
        Self::Build { parallel: false }
    }
}

/// Which composition the graph command shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompositionKind {
    Build,
    Serve,
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

/// Flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub env: Option<String>,
}

impl GlobalOptions {
    pub fn root(&self) -> AssetflowResult<PathBuf> {
        Ok(std::env::current_dir()?)
    }

    pub fn mode(&self) -> BuildMode {
        BuildMode::from_env_value(self.env.as_deref())
    }

    /// Load and validate the configuration, with the mode fixed
    pub fn load_config(&self) -> AssetflowResult<BuildConfig> {
        let root = self.root()?;
        let config = BuildConfig::load(&root, self.config.as_deref())?.with_mode(self.mode());

        let validation = ConfigValidator::validate(&config);
        for warning in &validation.warnings {
            tracing::warn!("{}", warning);
        }
        if !validation.is_valid() {
            return Err(AssetflowError::InvalidConfig {
                reason: validation.errors.join("; "),
                help: Some("Run 'assetflow validate' for details".into()),
            });
        }

        Ok(config)
    }

    pub fn context(&self) -> AssetflowResult<Arc<BuildContext>> {
        self.context_with(self.load_config()?)
    }

    pub fn context_with(&self, config: BuildConfig) -> AssetflowResult<Arc<BuildContext>> {
        Ok(BuildContext::new(self.root()?, config))
    }

    pub fn execution_options(&self) -> ExecutionOptions {
        ExecutionOptions {
            quiet: false,
            verbose: self.verbose,
        }
    }
}
