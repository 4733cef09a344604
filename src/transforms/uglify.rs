// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! JavaScript minification

use async_trait::async_trait;
use minify_js::{minify, Session, TopLevelMode};

use crate::errors::{AssetflowError, AssetflowResult};
use crate::pipeline::{FileObject, Stage};

/// Minifies `.js` files with minify-js; other files pass through
pub struct Uglify;

impl Uglify {
    /// Minify one script in global top-level mode
    pub fn minify(source: &[u8]) -> Result<Vec<u8>, String> {
        let session = Session::new();
        let mut out = Vec::with_capacity(source.len());
        minify(&session, TopLevelMode::Global, source, &mut out)
            .map_err(|e| format!("{:?}", e))?;
        Ok(out)
    }
}

#[async_trait]
impl Stage for Uglify {
    fn name(&self) -> &'static str {
        "uglify"
    }

    async fn apply(&self, mut file: FileObject) -> AssetflowResult<Option<FileObject>> {
        if !file.has_extension("js") {
            return Ok(Some(file));
        }

        file.contents = Self::minify(&file.contents).map_err(|message| {
            AssetflowError::ScriptMinify {
                path: file.path.clone(),
                message,
            }
        })?;

        Ok(Some(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
// Toggle the navigation drawer
function toggleNavigation(buttonElement) {
    const navigationDrawer = document.getElementById("drawer");
    const currentlyOpen = navigationDrawer.classList.contains("open");

    if (currentlyOpen) {
        navigationDrawer.classList.remove("open");
    } else {
        navigationDrawer.classList.add("open");
    }

    return !currentlyOpen;
}
"#;

    #[test]
    fn test_minify_reduces_size() {
        let out = Uglify::minify(SCRIPT.as_bytes()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.len() < SCRIPT.len());
        assert!(!text.contains("Toggle the navigation drawer"));
        assert!(text.contains("toggleNavigation"));
    }

    #[test]
    fn test_syntax_error() {
        assert!(Uglify::minify(b"function ( {").is_err());
    }

    #[tokio::test]
    async fn test_stage_skips_non_js() {
        let file = FileObject::new("/", "/icons.css", b".a { }".to_vec());
        let out = Uglify.apply(file).await.unwrap().unwrap();
        assert_eq!(out.contents, b".a { }");
    }
}
