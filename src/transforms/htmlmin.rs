// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! HTML whitespace collapsing

use async_trait::async_trait;
use minify_html::Cfg;

use crate::errors::AssetflowResult;
use crate::pipeline::{FileObject, Stage};

/// Collapses insignificant whitespace.
///
/// Comments, closing tags and the `<html>`/`<head>` openers are kept so the
/// output is structurally the page that was written.
pub struct CollapseWhitespace {
    cfg: Cfg,
}

impl CollapseWhitespace {
    pub fn new() -> Self {
        let mut cfg = Cfg::new();
        cfg.keep_comments = true;
        cfg.keep_closing_tags = true;
        cfg.keep_html_and_head_opening_tags = true;
        Self { cfg }
    }
}

impl Default for CollapseWhitespace {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Stage for CollapseWhitespace {
    fn name(&self) -> &'static str {
        "collapse-whitespace"
    }

    async fn apply(&self, mut file: FileObject) -> AssetflowResult<Option<FileObject>> {
        file.contents = minify_html::minify(&file.contents, &self.cfg);
        Ok(Some(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collapses_whitespace() {
        let html = "<html>\n  <head>\n    <title>Hi</title>\n  </head>\n  <body>\n    <p>hello      world</p>\n  </body>\n</html>\n";
        let file = FileObject::new("/", "/index.html", html.as_bytes().to_vec());

        let out = CollapseWhitespace::new().apply(file).await.unwrap().unwrap();
        let out = String::from_utf8(out.contents).unwrap();

        assert!(!out.contains("  "), "{}", out);
        assert!(!out.contains('\n'), "{}", out);
        assert!(out.contains("hello world"));
        assert!(out.len() < html.len());
    }
}
