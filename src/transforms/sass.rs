// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Sass compilation

use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::{AssetflowError, AssetflowResult};
use crate::pipeline::{FileObject, Stage};

/// Compiles `.scss` files to CSS with `grass`.
///
/// `_`-prefixed files are Sass partials and are dropped; anything that is not
/// `.scss` passes through untouched.
pub struct SassCompile {
    include_paths: Vec<PathBuf>,
}

impl SassCompile {
    pub fn new(include_paths: Vec<PathBuf>) -> Self {
        Self { include_paths }
    }

    fn compile(&self, file: &FileObject) -> AssetflowResult<String> {
        let mut options = grass::Options::default();
        if let Some(dir) = file.path.parent() {
            options = options.load_path(dir);
        }
        for path in &self.include_paths {
            options = options.load_path(path);
        }

        grass::from_string(file.text()?.to_owned(), &options).map_err(|e| {
            AssetflowError::StylesheetCompile {
                path: file.path.clone(),
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl Stage for SassCompile {
    fn name(&self) -> &'static str {
        "sass"
    }

    async fn apply(&self, mut file: FileObject) -> AssetflowResult<Option<FileObject>> {
        if !file.has_extension("scss") {
            return Ok(Some(file));
        }
        if file.file_name().starts_with('_') {
            return Ok(None);
        }

        let css = self.compile(&file)?;
        file.set_text(css);
        file.set_extension("css");

        let relative = file.relative().to_string_lossy().replace('\\', "/");
        if let Some(map) = file.source_map.as_mut() {
            map.file = relative;
        }

        Ok(Some(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SourceMap;
    use tempfile::TempDir;

    fn scss(dir: &TempDir, name: &str, content: &str) -> FileObject {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        FileObject::new(dir.path(), path, content.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_compiles_and_renames() {
        let dir = TempDir::new().unwrap();
        let file = scss(&dir, "main.scss", "$c: red;\n.a { .b { color: $c; } }\n");

        let out = SassCompile::new(vec![]).apply(file).await.unwrap().unwrap();
        assert_eq!(out.file_name(), "main.css");
        let css = out.text().unwrap();
        assert!(css.contains(".a .b"));
        assert!(css.contains("color: red"));
    }

    #[tokio::test]
    async fn test_resolves_sibling_partials() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("_vars.scss"), "$w: 10px;").unwrap();
        let file = scss(&dir, "main.scss", "@import 'vars';\n.x { width: $w; }\n");

        let out = SassCompile::new(vec![]).apply(file).await.unwrap().unwrap();
        assert!(out.text().unwrap().contains("width: 10px"));
    }

    #[tokio::test]
    async fn test_include_paths() {
        let dir = TempDir::new().unwrap();
        let lib = dir.path().join("node_modules/theme");
        std::fs::create_dir_all(&lib).unwrap();
        std::fs::write(lib.join("_colors.scss"), "$brand: #123456;").unwrap();
        let file = scss(&dir, "main.scss", "@import 'theme/colors';\n.x { color: $brand; }\n");

        let out = SassCompile::new(vec![dir.path().join("node_modules")])
            .apply(file)
            .await
            .unwrap()
            .unwrap();
        assert!(out.text().unwrap().contains("#123456"));
    }

    #[tokio::test]
    async fn test_partials_are_dropped() {
        let dir = TempDir::new().unwrap();
        let file = scss(&dir, "_mixins.scss", "@mixin m { a: b; }");
        assert!(SassCompile::new(vec![]).apply(file).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_scss_passes_through() {
        let dir = TempDir::new().unwrap();
        let file = FileObject::new(dir.path(), dir.path().join("notes.txt"), b"{{".to_vec());
        let out = SassCompile::new(vec![]).apply(file).await.unwrap().unwrap();
        assert_eq!(out.contents, b"{{");
    }

    #[tokio::test]
    async fn test_syntax_error_is_recoverable() {
        let dir = TempDir::new().unwrap();
        let file = scss(&dir, "broken.scss", ".a { color: red;\n");

        let err = SassCompile::new(vec![]).apply(file).await.unwrap_err();
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_updates_source_map_file() {
        let dir = TempDir::new().unwrap();
        let mut file = scss(&dir, "main.scss", ".a { b: c; }");
        file.source_map = Some(SourceMap::for_file(&file));

        let out = SassCompile::new(vec![]).apply(file).await.unwrap().unwrap();
        let map = out.source_map.unwrap();
        assert_eq!(map.file, "main.css");
        assert_eq!(map.sources, vec!["main.scss"]);
    }
}
