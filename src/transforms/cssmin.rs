// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! CSS minification

use async_trait::async_trait;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

use crate::errors::{AssetflowError, AssetflowResult};
use crate::pipeline::{FileObject, Stage};

/// Minifies `.css` files with lightningcss
pub struct CssMinify;

impl CssMinify {
    /// Minify a stylesheet; `filename` only shows up in error messages
    pub fn minify(filename: &str, code: &str) -> Result<String, String> {
        let options = ParserOptions {
            filename: filename.to_string(),
            ..ParserOptions::default()
        };

        let mut sheet = StyleSheet::parse(code, options).map_err(|e| e.to_string())?;
        sheet
            .minify(MinifyOptions::default())
            .map_err(|e| e.to_string())?;

        let printed = sheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| e.to_string())?;

        Ok(printed.code)
    }
}

#[async_trait]
impl Stage for CssMinify {
    fn name(&self) -> &'static str {
        "cssmin"
    }

    async fn apply(&self, mut file: FileObject) -> AssetflowResult<Option<FileObject>> {
        if !file.has_extension("css") {
            return Ok(Some(file));
        }

        let minified = Self::minify(file.file_name(), file.text()?).map_err(|message| {
            AssetflowError::CssMinify {
                path: file.path.clone(),
                message,
            }
        })?;
        file.set_text(minified);

        Ok(Some(file))
    }
}
