// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Script import concatenation
//!
//! Each `@import "file";` line (also accepted as `// @import 'file'`) is
//! replaced by the referenced file. Imports resolve relative to the file that
//! contains them and default to a `.js` extension. A file is inlined at most
//! once per bundle, which also makes import cycles harmless.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::{AssetflowError, AssetflowResult};
use crate::pipeline::{FileObject, Stage};

/// Bundles scripts by inlining their imports
#[derive(Clone)]
pub struct ScriptImports {
    hide_console: bool,
    import_re: Regex,
}

impl ScriptImports {
    pub fn new(hide_console: bool) -> Self {
        Self {
            hide_console,
            import_re: Regex::new(
                r#"(?mR)^[ \t]*(?://[ \t]*)?@import[ \t]+["']([^"'\r\n]+)["'][ \t]*;?[ \t]*$"#,
            )
            .expect("static import pattern"),
        }
    }

    /// Bundle `source`, which was read from `path`
    pub fn bundle(&self, path: &Path, source: &str) -> AssetflowResult<String> {
        let mut seen = HashSet::new();
        seen.insert(normalize(path));
        self.expand(path, source, &mut seen)
    }

    fn expand(&self, from: &Path, source: &str, seen: &mut HashSet<PathBuf>) -> AssetflowResult<String> {
        let dir = from.parent().unwrap_or_else(|| Path::new(""));
        let mut out = String::with_capacity(source.len());
        let mut last = 0;

        for caps in self.import_re.captures_iter(source) {
            let (Some(whole), Some(target)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&source[last..whole.start()]);
            last = whole.end();

            let import = target.as_str().trim();
            let mut resolved = dir.join(import);
            if resolved.extension().is_none() {
                resolved.set_extension("js");
            }
            let key = normalize(&resolved);

            if !seen.insert(key) {
                if !self.hide_console {
                    tracing::info!("skip {} (already inlined)", resolved.display());
                }
                continue;
            }

            let content = std::fs::read_to_string(&resolved).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AssetflowError::ScriptImportNotFound {
                        import: import.to_string(),
                        from: from.to_path_buf(),
                    }
                } else {
                    AssetflowError::read(&resolved, e)
                }
            })?;

            if !self.hide_console {
                tracing::info!("import {} → {}", resolved.display(), from.display());
            }

            let expanded = self.expand(&resolved, &content, seen)?;
            out.push_str(expanded.trim_end_matches(['\r', '\n']));
        }

        out.push_str(&source[last..]);
        Ok(out)
    }
}

/// Canonical form used to detect repeat imports
fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[async_trait]
impl Stage for ScriptImports {
    fn name(&self) -> &'static str {
        "js-import"
    }

    async fn apply(&self, mut file: FileObject) -> AssetflowResult<Option<FileObject>> {
        // Imports are read and canonicalized on a blocking thread
        let stage = self.clone();
        let path = file.path.clone();
        let source = file.text()?.to_string();
        let bundled = tokio::task::spawn_blocking(move || stage.bundle(&path, &source))
            .await
            .map_err(|e| AssetflowError::TaskFailed {
                task: self.name().to_string(),
                message: e.to_string(),
            })??;

        file.set_text(bundled);
        Ok(Some(file))
    }
}
