// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Files in transit through a pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{AssetflowError, AssetflowResult};

/// One file flowing through a pipeline.
///
/// `path` is absolute; `base` is the directory the selecting glob was rooted
/// at, so `relative()` is where the file lands under each destination.
#[derive(Debug, Clone)]
pub struct FileObject {
    pub base: PathBuf,
    pub path: PathBuf,
    pub contents: Vec<u8>,
    pub source_map: Option<SourceMap>,
}

impl FileObject {
    /// Create a file object from already-loaded contents
    pub fn new(base: impl Into<PathBuf>, path: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        Self {
            base: base.into(),
            path: path.into(),
            contents,
            source_map: None,
        }
    }

    /// Read a file from disk
    pub async fn read(base: &Path, path: &Path) -> AssetflowResult<Self> {
        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| AssetflowError::read(path, e))?;

        Ok(Self::new(base, path, contents))
    }

    /// Path relative to the selection base
    pub fn relative(&self) -> &Path {
        self.path.strip_prefix(&self.base).unwrap_or(&self.path)
    }

    /// File name without directories
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Lowercased extension, if any
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        self.extension().as_deref() == Some(ext)
    }

    /// Swap the extension, e.g. after compiling `.scss` to `.css`
    pub fn set_extension(&mut self, ext: &str) {
        self.path.set_extension(ext);
    }

    /// Contents as UTF-8
    pub fn text(&self) -> AssetflowResult<&str> {
        std::str::from_utf8(&self.contents).map_err(|e| AssetflowError::FileReadError {
            path: self.path.clone(),
            error: format!("not valid UTF-8: {}", e),
        })
    }

    pub fn set_text(&mut self, text: String) {
        self.contents = text.into_bytes();
    }
}

/// Source map attached between map init and map write.
///
/// Only the source-level information is tracked; the compiler we delegate to
/// does not report mappings, so `mappings` stays empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    pub file: String,
    pub sources: Vec<String>,
    pub sources_content: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// Start a map for a file as it looks right now
    pub fn for_file(file: &FileObject) -> Self {
        let name = file.relative().to_string_lossy().replace('\\', "/");
        Self {
            version: 3,
            file: name.clone(),
            sources: vec![name],
            sources_content: vec![String::from_utf8_lossy(&file.contents).into_owned()],
            mappings: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_and_extension() {
        let mut file = FileObject::new("/p/src/scss", "/p/src/scss/pages/home.SCSS", vec![]);
        assert_eq!(file.relative(), Path::new("pages/home.SCSS"));
        assert!(file.has_extension("scss"));

        file.set_extension("css");
        assert_eq!(file.relative(), Path::new("pages/home.css"));
        assert_eq!(file.file_name(), "home.css");
    }

    #[test]
    fn test_text_rejects_binary() {
        let file = FileObject::new("/p", "/p/logo.png", vec![0xff, 0xfe, 0x00]);
        assert!(file.text().is_err());
    }

    #[test]
    fn test_source_map_for_file() {
        let file = FileObject::new("/p/src/scss", "/p/src/scss/main.scss", b"a{b:c}".to_vec());
        let map = SourceMap::for_file(&file);
        assert_eq!(map.sources, vec!["main.scss"]);
        assert_eq!(map.sources_content, vec!["a{b:c}"]);

        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("\"sourcesContent\""));
    }
}
