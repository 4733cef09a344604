// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Asset transforms
//!
//! Pipeline stages wrapping the libraries that do the real work: `grass` for
//! Sass, `lightningcss` for CSS, `minify-html` and `minify-js` for markup and
//! scripts. Partial inlining and import concatenation are done here.

mod cssmin;
mod htmlmin;
mod js_import;
mod partials;
mod sass;
mod sourcemaps;
mod uglify;

pub use cssmin::CssMinify;
pub use htmlmin::CollapseWhitespace;
pub use js_import::ScriptImports;
pub use partials::HtmlPartials;
pub use sass::SassCompile;
pub use sourcemaps::{SourceMapInit, SourceMapWrite};
pub use uglify::Uglify;
