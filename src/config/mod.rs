// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Project configuration
//!
//! Defines the schema for `.assetflow.yaml`. Every field has a default, so a
//! project laid out as `src/` → `dist/` with a `node_modules` store needs no
//! config file at all.
//!
//! Task sources, partials and watch patterns are relative to `paths.src`.
//! Vendor sources are relative to `paths.store`. Everything else is relative
//! to the project root.

mod validation;

pub use validation::{ConfigValidator, ValidationResult};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{AssetflowError, AssetflowResult};
use crate::tasks::TaskKind;

/// File names probed, in order, when no `--config` is given
pub const CONFIG_FILES: &[&str] = &[".assetflow.yaml", ".assetflow.yml", "assetflow.toml"];

/// Environment variable selecting the build mode
pub const MODE_ENV_VAR: &str = "NODE_ENV";

/// Production vs development
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Source maps on, minification off
    #[default]
    Development,
    /// Minification and whitespace collapse on, no source maps
    Production,
}

impl BuildMode {
    /// Resolve the mode from the raw environment value.
    ///
    /// Only the exact value `prod` selects production.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("prod") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Config version (for future compatibility)
    #[serde(default = "default_version")]
    pub version: String,

    /// Build mode, resolved at startup and never read from the file
    #[serde(skip)]
    pub mode: BuildMode,

    #[serde(default)]
    pub paths: Paths,

    #[serde(default)]
    pub markup: MarkupConfig,

    #[serde(default)]
    pub stylesheet: StylesheetConfig,

    #[serde(default)]
    pub script: ScriptConfig,

    #[serde(default)]
    pub image: ImageConfig,

    /// Third-party artifacts copied into the vendor directories
    #[serde(default = "default_vendor_manifest")]
    pub vendor: Vec<VendorEntry>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

fn default_version() -> String {
    "1".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            mode: BuildMode::default(),
            paths: Paths::default(),
            markup: MarkupConfig::default(),
            stylesheet: StylesheetConfig::default(),
            script: ScriptConfig::default(),
            image: ImageConfig::default(),
            vendor: default_vendor_manifest(),
            server: ServerConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Load configuration for a project.
    ///
    /// An explicit path must exist. Without one, the first of
    /// [`CONFIG_FILES`] found under `root` is used, falling back to defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> AssetflowResult<Self> {
        if let Some(path) = explicit {
            let path = root.join(path);
            if !path.exists() {
                return Err(AssetflowError::ConfigNotFound { path });
            }
            return Self::from_file(&path);
        }

        for name in CONFIG_FILES {
            let candidate = root.join(name);
            if candidate.exists() {
                tracing::debug!("Using config {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a YAML or TOML file
    pub fn from_file(path: &Path) -> AssetflowResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AssetflowError::read(path, e))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> AssetflowResult<Self> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Parse configuration from TOML
    pub fn from_toml(source: &str) -> AssetflowResult<Self> {
        toml::from_str(source).map_err(Into::into)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> AssetflowResult<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// Fix the build mode for the rest of the run
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Output directory of a task, relative to the project root
    pub fn output_dir(&self, task: TaskKind) -> PathBuf {
        let dest = &self.paths.dest;
        match task {
            TaskKind::Clean | TaskKind::Markup => dest.clone(),
            TaskKind::Stylesheet => dest.join(&self.stylesheet.dest),
            TaskKind::Script => dest.join(&self.script.dest),
            TaskKind::Image => dest.join(&self.image.dest),
            TaskKind::Vendor => dest.join("vendor"),
        }
    }

    /// Source-tree vendor directory, relative to the project root
    pub fn source_vendor_dir(&self) -> PathBuf {
        self.paths.src.join("vendor")
    }

    /// Partials directory, relative to the project root
    pub fn partials_dir(&self) -> PathBuf {
        self.paths.src.join(&self.paths.partials)
    }
}

/// Project directory layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    /// Source root
    #[serde(default = "default_src")]
    pub src: PathBuf,

    /// Output root
    #[serde(default = "default_dest")]
    pub dest: PathBuf,

    /// Markup partials directory, under `src`
    #[serde(default = "default_partials")]
    pub partials: PathBuf,

    /// Dependency store the vendor manifest copies from
    #[serde(default = "default_store")]
    pub store: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            src: default_src(),
            dest: default_dest(),
            partials: default_partials(),
            store: default_store(),
        }
    }
}

fn default_src() -> PathBuf {
    PathBuf::from("src")
}

fn default_dest() -> PathBuf {
    PathBuf::from("dist")
}

fn default_partials() -> PathBuf {
    PathBuf::from("partials")
}

fn default_store() -> PathBuf {
    PathBuf::from("node_modules")
}

/// Markup task settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupConfig {
    #[serde(default = "default_markup_sources")]
    pub sources: Vec<String>,

    /// Element name that marks a partial include
    #[serde(default = "default_partial_tag")]
    pub partial_tag: String,

    /// Prefix of variables substituted inside partials
    #[serde(default = "default_variable_prefix")]
    pub variable_prefix: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            sources: default_markup_sources(),
            partial_tag: default_partial_tag(),
            variable_prefix: default_variable_prefix(),
        }
    }
}

fn default_markup_sources() -> Vec<String> {
    vec!["*.html".to_string()]
}

fn default_partial_tag() -> String {
    "partial".to_string()
}

fn default_variable_prefix() -> String {
    "@@".to_string()
}

/// Stylesheet task settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylesheetConfig {
    #[serde(default = "default_stylesheet_sources")]
    pub sources: Vec<String>,

    /// Extra load paths for `@use` / `@import`, searched before the
    /// dependency store
    #[serde(default = "default_include_paths")]
    pub include_paths: Vec<PathBuf>,

    /// Output subdirectory under `paths.dest`
    #[serde(default = "default_css_dest")]
    pub dest: PathBuf,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            sources: default_stylesheet_sources(),
            include_paths: default_include_paths(),
            dest: default_css_dest(),
        }
    }
}

fn default_stylesheet_sources() -> Vec<String> {
    vec!["scss/**/*".to_string()]
}

fn default_include_paths() -> Vec<PathBuf> {
    Vec::new()
}

fn default_css_dest() -> PathBuf {
    PathBuf::from("css")
}

/// Script task settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptConfig {
    #[serde(default = "default_script_sources")]
    pub sources: Vec<String>,

    /// Suppress per-import diagnostics
    #[serde(default = "default_true")]
    pub hide_console: bool,

    /// Output subdirectory under `paths.dest`
    #[serde(default = "default_js_dest")]
    pub dest: PathBuf,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            sources: default_script_sources(),
            hide_console: true,
            dest: default_js_dest(),
        }
    }
}

fn default_script_sources() -> Vec<String> {
    vec!["js/*.js".to_string()]
}

fn default_js_dest() -> PathBuf {
    PathBuf::from("js")
}

fn default_true() -> bool {
    true
}

/// Image task settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_image_sources")]
    pub sources: Vec<String>,

    /// Output subdirectory under `paths.dest`
    #[serde(default = "default_image_dest")]
    pub dest: PathBuf,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            sources: default_image_sources(),
            dest: default_image_dest(),
        }
    }
}

fn default_image_sources() -> Vec<String> {
    vec!["images/**/*".to_string()]
}

fn default_image_dest() -> PathBuf {
    PathBuf::from("images")
}

/// One third-party artifact set copied by the vendor task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VendorEntry {
    /// Dependency name (unique within the manifest)
    pub name: String,

    /// Globs relative to the dependency store; a leading `!` excludes
    pub sources: Vec<String>,

    /// Subdirectory under each vendor directory
    #[serde(default)]
    pub dest: PathBuf,

    /// Minify `.js` artifacts in production
    #[serde(default)]
    pub minify: bool,
}

impl VendorEntry {
    fn new(name: &str, sources: &[&str], dest: &str, minify: bool) -> Self {
        Self {
            name: name.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            dest: PathBuf::from(dest),
            minify,
        }
    }
}

/// The stock manifest: UI framework, icon font, DOM utility, positioning engine
pub fn default_vendor_manifest() -> Vec<VendorEntry> {
    vec![
        VendorEntry::new(
            "bootstrap",
            &["bootstrap/dist/js/bootstrap.min.js"],
            "",
            true,
        ),
        VendorEntry::new(
            "bootstrap-icons",
            &["bootstrap-icons/font/**/*"],
            "bootstrap-icons",
            true,
        ),
        VendorEntry::new(
            "jquery",
            &[
                "jquery/dist/jquery.min.js",
                "!jquery/dist/core.js",
            ],
            "",
            true,
        ),
        VendorEntry::new(
            "popper",
            &["@popperjs/core/dist/cjs/popper.js"],
            "",
            false,
        ),
    ]
}

/// Dev server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Open the served URL in a browser on startup
    #[serde(default = "default_true")]
    pub open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open: true,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Watch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Globs (relative to `paths.src`) whose changes are ignored
    #[serde(default = "default_watch_ignore")]
    pub ignore: Vec<String>,

    #[serde(default = "default_bindings")]
    pub bindings: Vec<WatchBindingConfig>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            ignore: default_watch_ignore(),
            bindings: default_bindings(),
        }
    }
}

fn default_debounce() -> u64 {
    200
}

fn default_watch_ignore() -> Vec<String> {
    vec!["vendor/**".to_string()]
}

/// A glob → task binding for watch mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchBindingConfig {
    pub pattern: String,
    pub task: TaskKind,
    /// Force a full client reload after the task finishes
    #[serde(default)]
    pub reload: bool,
}

fn default_bindings() -> Vec<WatchBindingConfig> {
    let bind = |pattern: &str, task, reload| WatchBindingConfig {
        pattern: pattern.to_string(),
        task,
        reload,
    };

    vec![
        bind("**/*.html", TaskKind::Markup, true),
        bind("**/*.scss", TaskKind::Stylesheet, true),
        bind("**/*.js", TaskKind::Script, true),
        bind("images/**/*.*", TaskKind::Image, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mode_from_env_value() {
        assert_eq!(BuildMode::from_env_value(Some("prod")), BuildMode::Production);
        assert_eq!(BuildMode::from_env_value(Some("production")), BuildMode::Development);
        assert_eq!(BuildMode::from_env_value(Some("")), BuildMode::Development);
        assert_eq!(BuildMode::from_env_value(None), BuildMode::Development);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = BuildConfig::from_yaml("version: \"1\"\n").unwrap();
        assert_eq!(config.paths.dest, PathBuf::from("dist"));
        assert_eq!(config.markup.sources, vec!["*.html"]);
        assert_eq!(config.partials_dir(), PathBuf::from("src/partials"));
        assert_eq!(config.vendor.len(), 4);
        assert_eq!(config.watch.bindings.len(), 4);
        assert_eq!(config.mode, BuildMode::Development);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
paths:
  dest: public
script:
  hide_console: false
vendor:
  - name: alpine
    sources: ["alpinejs/dist/cdn.min.js"]
    minify: true
watch:
  bindings:
    - pattern: "**/*.js"
      task: script
      reload: true
"#;

        let config = BuildConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.paths.dest, PathBuf::from("public"));
        assert_eq!(config.paths.src, PathBuf::from("src"));
        assert!(!config.script.hide_console);
        assert_eq!(config.vendor.len(), 1);
        assert_eq!(config.vendor[0].dest, PathBuf::new());
        assert_eq!(config.watch.bindings[0].task, TaskKind::Script);
        assert_eq!(config.watch.debounce_ms, 200);
    }

    #[test]
    fn test_parse_toml() {
        let source = r#"
[paths]
dest = "out"

[server]
port = 8080
open = false
"#;

        let config = BuildConfig::from_toml(source).unwrap();
        assert_eq!(config.paths.dest, PathBuf::from("out"));
        assert_eq!(config.server.port, 8080);
        assert!(!config.server.open);
    }

    #[test]
    fn test_output_dirs() {
        let config = BuildConfig::default();
        assert_eq!(config.output_dir(TaskKind::Markup), PathBuf::from("dist"));
        assert_eq!(config.output_dir(TaskKind::Stylesheet), PathBuf::from("dist/css"));
        assert_eq!(config.output_dir(TaskKind::Script), PathBuf::from("dist/js"));
        assert_eq!(config.output_dir(TaskKind::Image), PathBuf::from("dist/images"));
        assert_eq!(config.output_dir(TaskKind::Vendor), PathBuf::from("dist/vendor"));
        assert_eq!(config.source_vendor_dir(), PathBuf::from("src/vendor"));
    }

    #[test]
    fn test_source_root_moves_relative_paths() {
        let config = BuildConfig::from_yaml("paths:\n  src: app\n  store: deps\n").unwrap();
        assert_eq!(config.partials_dir(), PathBuf::from("app/partials"));
        assert_eq!(config.source_vendor_dir(), PathBuf::from("app/vendor"));
        assert_eq!(config.script.sources, vec!["js/*.js"]);
        assert_eq!(config.paths.store, PathBuf::from("deps"));
    }

    #[test]
    fn test_load_explicit_missing() {
        let dir = TempDir::new().unwrap();
        let result = BuildConfig::load(dir.path(), Some(Path::new("nope.yaml")));
        assert!(matches!(result, Err(AssetflowError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_probes_config_files() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            BuildConfig::load(dir.path(), None).unwrap().paths.dest,
            PathBuf::from("dist")
        );

        std::fs::write(dir.path().join(".assetflow.yaml"), "paths:\n  dest: site\n").unwrap();
        let config = BuildConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.paths.dest, PathBuf::from("site"));
    }

    #[test]
    fn test_round_trip_yaml() {
        let config = BuildConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = BuildConfig::from_yaml(&yaml).unwrap();

        assert_eq!(parsed.vendor, config.vendor);
        assert_eq!(parsed.watch.bindings, config.watch.bindings);
    }
}
