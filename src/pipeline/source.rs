// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Source selectors
//!
//! Resolves glob patterns (with `!` exclusions) to the files a pipeline reads.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::{AssetflowError, AssetflowResult};

/// A file picked by a selector, with the base its relative path hangs off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub base: PathBuf,
    pub path: PathBuf,
}

/// Ordered set of patterns relative to a project root
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    patterns: Vec<String>,
}

impl SourceSet {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    fn includes(&self) -> impl Iterator<Item = &str> {
        self.patterns
            .iter()
            .filter(|p| !p.starts_with('!'))
            .map(String::as_str)
    }

    fn excludes(&self) -> AssetflowResult<Vec<glob::Pattern>> {
        self.patterns
            .iter()
            .filter_map(|p| p.strip_prefix('!'))
            .map(|p| glob::Pattern::new(p).map_err(Into::into))
            .collect()
    }

    /// Resolve every pattern under `root`.
    ///
    /// A glob that matches nothing contributes nothing. A literal path that
    /// does not exist is an error. Directories are never selected.
    pub fn resolve(&self, root: &Path) -> AssetflowResult<Vec<SelectedFile>> {
        let excludes = self.excludes()?;
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for pattern in self.includes() {
            let base = root.join(glob_base(pattern));
            let full = root.join(pattern);

            let matches: Vec<PathBuf> = if is_glob(pattern) {
                // The root is a literal prefix even if it contains glob syntax
                let escaped = PathBuf::from(glob::Pattern::escape(&root.to_string_lossy()));
                let mut matches = Vec::new();
                for entry in glob::glob(&escaped.join(pattern).to_string_lossy())? {
                    let path = entry.map_err(|e| {
                        let path = e.path().to_path_buf();
                        AssetflowError::read(path, e.into_error())
                    })?;
                    matches.push(path);
                }
                matches
            } else if full.exists() {
                vec![full]
            } else {
                return Err(AssetflowError::FileNotFound {
                    path: full,
                    help: Some(format!("Source '{}' is a literal path and must exist", pattern)),
                });
            };

            for path in matches {
                if !path.is_file() || !seen.insert(path.clone()) {
                    continue;
                }

                let relative = path.strip_prefix(root).unwrap_or(&path);
                if excludes.iter().any(|ex| ex.matches_path(relative)) {
                    continue;
                }

                files.push(SelectedFile {
                    base: base.clone(),
                    path,
                });
            }
        }

        Ok(files)
    }
}

/// Whether a pattern contains glob syntax
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Directory a pattern's matches are made relative to: everything before the
/// first component with glob syntax, or the parent of a literal path.
pub fn glob_base(pattern: &str) -> PathBuf {
    if !is_glob(pattern) {
        return Path::new(pattern)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
    }

    pattern
        .split('/')
        .take_while(|component| !is_glob(component))
        .collect()
}
