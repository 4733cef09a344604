// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Error types
//!
//! Every failure carries a diagnostic code and, where we can say something
//! useful, a hint pointing at the fix.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for assetflow operations
pub type AssetflowResult<T> = Result<T, AssetflowError>;

/// Main error type for assetflow
#[derive(Error, Debug, Diagnostic)]
pub enum AssetflowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Config file not found: {path}")]
    #[diagnostic(
        code(assetflow::config_not_found),
        help("Create one with 'assetflow init' or drop the --config flag to use defaults")
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(code(assetflow::invalid_config))]
    InvalidConfig {
        reason: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Composition Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Circular dependency detected")]
    #[diagnostic(
        code(assetflow::circular_dependency),
        help("Review task dependencies to remove the cycle")
    )]
    CircularDependency { tasks: Vec<String> },

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    #[diagnostic(
        code(assetflow::unknown_dependency),
        help("Check that '{dependency}' is part of the same composition")
    )]
    UnknownDependency { task: String, dependency: String },

    #[error("Unknown task: {name}")]
    #[diagnostic(
        code(assetflow::unknown_task),
        help("Available tasks: clean, markup, stylesheet, script, image, vendor")
    )]
    UnknownTask { name: String },

    #[error("Task '{task}' failed: {message}")]
    #[diagnostic(code(assetflow::task_failed))]
    TaskFailed { task: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Markup Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Partial '{partial}' referenced from {page} does not exist")]
    #[diagnostic(
        code(assetflow::partial_not_found),
        help("Partials are looked up in {searched}")
    )]
    PartialNotFound {
        partial: String,
        page: PathBuf,
        searched: String,
    },

    #[error("Partial include cycle: {}", chain.join(" → "))]
    #[diagnostic(code(assetflow::partial_cycle))]
    PartialCycle { chain: Vec<String> },

    #[error("Invalid markup in {path}: {reason}")]
    #[diagnostic(code(assetflow::invalid_markup))]
    InvalidMarkup { path: PathBuf, reason: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Stylesheet / Script Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to compile {path}: {message}")]
    #[diagnostic(code(assetflow::stylesheet_compile))]
    StylesheetCompile { path: PathBuf, message: String },

    #[error("Failed to minify stylesheet {path}: {message}")]
    #[diagnostic(code(assetflow::css_minify))]
    CssMinify { path: PathBuf, message: String },

    #[error("Import '{import}' in {from} could not be resolved")]
    #[diagnostic(
        code(assetflow::script_import_not_found),
        help("Imports are resolved relative to the importing file")
    )]
    ScriptImportNotFound { import: String, from: PathBuf },

    #[error("Failed to minify script {path}: {message}")]
    #[diagnostic(code(assetflow::script_minify))]
    ScriptMinify { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Vendoring Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Vendor artifact '{name}' not found: {pattern}")]
    #[diagnostic(
        code(assetflow::vendor_artifact_missing),
        help("Install the dependency into the dependency store (e.g. `npm install`)")
    )]
    VendorArtifactMissing { name: String, pattern: String },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("File not found: {path}")]
    #[diagnostic(code(assetflow::file_not_found))]
    FileNotFound {
        path: PathBuf,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(assetflow::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(assetflow::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Dev Server / Watch Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Dev server error: {message}")]
    #[diagnostic(code(assetflow::server_error))]
    Server { message: String },

    #[error("Watch error: {message}")]
    #[diagnostic(code(assetflow::watch_error))]
    Watch { message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(assetflow::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(assetflow::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(assetflow::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(assetflow::toml_error))]
    Toml { message: String },

    #[error("Glob pattern error: {message}")]
    #[diagnostic(code(assetflow::glob_error))]
    GlobPattern { message: String },
}

impl From<std::io::Error> for AssetflowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for AssetflowError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for AssetflowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for AssetflowError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl From<glob::PatternError> for AssetflowError {
    fn from(e: glob::PatternError) -> Self {
        Self::GlobPattern { message: e.to_string() }
    }
}

impl AssetflowError {
    /// Whether a task may log this error and keep the process alive.
    ///
    /// Only stylesheet compilation qualifies: a typo in one `.scss` file must
    /// not take down a running `serve`.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::StylesheetCompile { .. })
    }

    /// Build a read error for `path`
    pub fn read(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::FileReadError {
            path: path.into(),
            error: error.to_string(),
        }
    }

    /// Build a write error for `path`
    pub fn write(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::FileWriteError {
            path: path.into(),
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_stylesheet_errors_are_recoverable() {
        let compile = AssetflowError::StylesheetCompile {
            path: "main.scss".into(),
            message: "expected \";\"".into(),
        };
        let partial = AssetflowError::PartialNotFound {
            partial: "nav.html".into(),
            page: "index.html".into(),
            searched: "src/partials".into(),
        };

        assert!(compile.is_recoverable());
        assert!(!partial.is_recoverable());
    }

    #[test]
    fn test_partial_cycle_message() {
        let err = AssetflowError::PartialCycle {
            chain: vec!["a.html".into(), "b.html".into(), "a.html".into()],
        };
        assert_eq!(
            err.to_string(),
            "Partial include cycle: a.html → b.html → a.html"
        );
    }
}
