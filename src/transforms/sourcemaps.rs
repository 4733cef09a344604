// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Source map tracking
//!
//! [`SourceMapInit`] snapshots a file before compilation; [`SourceMapWrite`]
//! serializes the map and inlines it as a `sourceMappingURL` comment.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::errors::AssetflowResult;
use crate::pipeline::{FileObject, SourceMap, Stage};

/// Starts tracking a source map for each file
pub struct SourceMapInit;

#[async_trait]
impl Stage for SourceMapInit {
    fn name(&self) -> &'static str {
        "sourcemaps-init"
    }

    async fn apply(&self, mut file: FileObject) -> AssetflowResult<Option<FileObject>> {
        file.source_map = Some(SourceMap::for_file(&file));
        Ok(Some(file))
    }
}

/// Inlines the tracked map at the end of the file
pub struct SourceMapWrite;

impl SourceMapWrite {
    /// Comment carrying `map` as a base64 data URL
    pub fn comment(map: &SourceMap) -> AssetflowResult<String> {
        let json = serde_json::to_string(map)?;
        Ok(format!(
            "/*# sourceMappingURL=data:application/json;charset=utf8;base64,{} */",
            STANDARD.encode(json)
        ))
    }
}

#[async_trait]
impl Stage for SourceMapWrite {
    fn name(&self) -> &'static str {
        "sourcemaps-write"
    }

    async fn apply(&self, mut file: FileObject) -> AssetflowResult<Option<FileObject>> {
        let Some(map) = file.source_map.take() else {
            return Ok(Some(file));
        };

        let comment = Self::comment(&map)?;
        if !file.contents.ends_with(b"\n") {
            file.contents.push(b'\n');
        }
        file.contents.extend_from_slice(comment.as_bytes());
        file.contents.push(b'\n');

        Ok(Some(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_then_write_inlines_map() {
        let file = FileObject::new("/p", "/p/main.css", b"a { b: c; }".to_vec());
        let file = SourceMapInit.apply(file).await.unwrap().unwrap();
        assert!(file.source_map.is_some());

        let out = SourceMapWrite.apply(file).await.unwrap().unwrap();
        let text = out.text().unwrap();

        assert!(text.starts_with("a { b: c; }\n/*# sourceMappingURL=data:application/json"));
        assert!(out.source_map.is_none());

        let encoded = text
            .trim_end()
            .trim_end_matches(" */")
            .rsplit("base64,")
            .next()
            .unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        let map: SourceMap = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(map.sources, vec!["main.css"]);
    }

    #[tokio::test]
    async fn test_write_without_map_is_noop() {
        let file = FileObject::new("/p", "/p/main.css", b"a{}".to_vec());
        let out = SourceMapWrite.apply(file).await.unwrap().unwrap();
        assert_eq!(out.contents, b"a{}");
    }
}
