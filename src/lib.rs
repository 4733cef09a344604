// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! # assetflow - Static site asset pipeline
//!
//! `assetflow` builds a static site from a `src/` tree into `dist/`: pages with
//! partials inlined, Sass compiled to CSS, scripts bundled, images and
//! third-party artifacts copied. A development server watches the sources
//! and pushes live reloads to the browser.
//!
//! ## Features
//!
//! - **Pipelines** - glob selection, ordered stages, hash-skipped writes
//! - **Build modes** - source maps in development, minification in production
//! - **Explicit task graph** - dependencies validated before anything runs
//! - **Live reload** - CSS injection or full reload, scoped per task
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default config and source layout
//! assetflow init
//!
//! # Clean and build
//! assetflow
//!
//! # Production build
//! NODE_ENV=prod assetflow
//!
//! # Develop with live reload
//! assetflow serve
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod pipeline;
pub mod reload;
pub mod tasks;
pub mod transforms;
pub mod utils;
pub mod watch;

// Re-export commonly used types
pub use config::{BuildConfig, BuildMode};
pub use errors::{AssetflowError, AssetflowResult};
pub use graph::{Composition, DagBuilder, TaskExecutor};
pub use pipeline::{Pipeline, Stage};
pub use tasks::{run_task, BuildContext, TaskKind, TaskReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
