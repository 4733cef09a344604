// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Configuration validation
//!
//! Validates configuration before any task touches the filesystem.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::config::BuildConfig;
use crate::tasks::TaskKind;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    pub fn validate(config: &BuildConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        Self::validate_sources("markup", &config.markup.sources, &mut result);
        Self::validate_sources("stylesheet", &config.stylesheet.sources, &mut result);
        Self::validate_sources("script", &config.script.sources, &mut result);
        Self::validate_sources("image", &config.image.sources, &mut result);

        if config.markup.partial_tag.trim().is_empty() {
            result.add_error("markup: partial_tag is empty");
        }
        if config.markup.variable_prefix.is_empty() {
            result.add_error("markup: variable_prefix is empty");
        }

        Self::validate_vendor(config, &mut result);
        Self::validate_output_overlap(config, &mut result);
        Self::validate_watch(config, &mut result);

        result
    }

    fn validate_sources(task: &str, sources: &[String], result: &mut ValidationResult) {
        if sources.is_empty() {
            result.add_error(&format!("{}: source list is empty", task));
            return;
        }

        for source in sources {
            let pattern = source.strip_prefix('!').unwrap_or(source);
            if pattern.is_empty() {
                result.add_error(&format!("{}: source pattern is empty", task));
            } else if let Err(e) = glob::Pattern::new(pattern) {
                result.add_error(&format!("{}: invalid pattern '{}': {}", task, source, e));
            }
        }
    }

    fn validate_vendor(config: &BuildConfig, result: &mut ValidationResult) {
        let mut seen_names = HashSet::new();

        for entry in &config.vendor {
            if !seen_names.insert(&entry.name) {
                result.add_error(&format!("Duplicate vendor entry: '{}'", entry.name));
            }

            if !entry.sources.iter().any(|s| !s.starts_with('!')) {
                result.add_error(&format!(
                    "vendor '{}': needs at least one non-excluding source",
                    entry.name
                ));
            }

            Self::validate_sources(&format!("vendor '{}'", entry.name), &entry.sources, result);

            if !is_contained(&entry.dest) {
                result.add_error(&format!(
                    "vendor '{}': destination '{}' must stay inside the vendor directory",
                    entry.name,
                    entry.dest.display()
                ));
            }
        }
    }

    /// Writers share the output tree without locking; they only stay out of
    /// each other's way if their directories are disjoint.
    fn validate_output_overlap(config: &BuildConfig, result: &mut ValidationResult) {
        let writers = [
            TaskKind::Stylesheet,
            TaskKind::Script,
            TaskKind::Image,
            TaskKind::Vendor,
        ];
        let dirs: Vec<(TaskKind, PathBuf)> = writers
            .iter()
            .map(|&task| (task, config.output_dir(task)))
            .collect();

        for (i, (a, dir_a)) in dirs.iter().enumerate() {
            if dir_a == &config.paths.dest {
                result.add_warning(&format!(
                    "{}: output directory is the output root and may collide with markup",
                    a
                ));
            }
            for (b, dir_b) in &dirs[i + 1..] {
                if dir_a.starts_with(dir_b) || dir_b.starts_with(dir_a) {
                    result.add_warning(&format!(
                        "{} and {} write to overlapping directories ({} / {})",
                        a,
                        b,
                        dir_a.display(),
                        dir_b.display()
                    ));
                }
            }
        }
    }

    fn validate_watch(config: &BuildConfig, result: &mut ValidationResult) {
        if config.watch.debounce_ms == 0 {
            result.add_error("watch: debounce_ms must be greater than zero");
        }

        if config.watch.bindings.is_empty() {
            result.add_warning("watch: no bindings, serve will not rebuild on change");
        }

        for binding in &config.watch.bindings {
            if binding.task == TaskKind::Clean {
                result.add_warning(&format!(
                    "watch: '{}' re-runs clean, which empties the output directory",
                    binding.pattern
                ));
            }
            if let Err(e) = glob::Pattern::new(&binding.pattern) {
                result.add_error(&format!(
                    "watch: invalid pattern '{}': {}",
                    binding.pattern, e
                ));
            }
        }

        for ignore in &config.watch.ignore {
            if let Err(e) = glob::Pattern::new(ignore) {
                result.add_error(&format!("watch: invalid ignore '{}': {}", ignore, e));
            }
        }
    }

    /// Check that source directories exist (runtime validation)
    pub fn validate_files(config: &BuildConfig, base_path: &Path) -> Vec<String> {
        let mut missing = Vec::new();

        let dirs = [
            ("Source root", &config.paths.src),
            ("Partials directory", &config.partials_dir()),
            ("Dependency store", &config.paths.store),
        ];

        for (label, dir) in dirs {
            if !base_path.join(dir).is_dir() {
                missing.push(format!("{} not found: {}", label, dir.display()));
            }
        }

        missing
    }
}

/// Relative path that cannot climb out of its parent
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Result of configuration validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
