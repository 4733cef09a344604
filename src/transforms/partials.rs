// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! HTML partial inlining
//!
//! `<partial src="nav.html" title="Home"></partial>` is replaced by the
//! contents of `nav.html` from the partials directory, with every `@@title`
//! inside it substituted. Partials may include further partials.

use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::errors::{AssetflowError, AssetflowResult};
use crate::pipeline::{FileObject, Stage};

/// Inlines partial fragments into pages
#[derive(Clone)]
pub struct HtmlPartials {
    dir: PathBuf,
    prefix: String,
    open_re: Regex,
    close_re: Regex,
    attr_re: Regex,
}

impl HtmlPartials {
    pub fn new(dir: impl Into<PathBuf>, tag: &str, prefix: &str) -> AssetflowResult<Self> {
        let tag = regex::escape(tag);
        let invalid = |e: regex::Error| AssetflowError::InvalidConfig {
            reason: format!("partial tag produces an invalid pattern: {}", e),
            help: None,
        };
        let open_re = Regex::new(&format!(r"<{tag}\b([^>]*?)\s*(/?)>")).map_err(invalid)?;
        let close_re = Regex::new(&format!(r"</{tag}\s*>")).map_err(invalid)?;
        let attr_re = Regex::new(r#"([A-Za-z_:][-\w:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .map_err(|e| AssetflowError::InvalidConfig {
                reason: e.to_string(),
                help: None,
            })?;

        Ok(Self {
            dir: dir.into(),
            prefix: prefix.to_string(),
            open_re,
            close_re,
            attr_re,
        })
    }

    /// Expand every partial in `html`, which was read from `page`
    pub fn render(&self, page: &Path, html: &str) -> AssetflowResult<String> {
        self.expand(page, html, &mut Vec::new())
    }

    fn expand(&self, page: &Path, html: &str, stack: &mut Vec<String>) -> AssetflowResult<String> {
        let mut out = String::with_capacity(html.len());
        let mut last = 0;

        while let Some(caps) = self.open_re.captures_at(html, last) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            out.push_str(&html[last..whole.start()]);
            let self_closing = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
            last = if self_closing {
                whole.end()
            } else {
                self.closing_end(page, html, whole)?
            };

            let mut attrs = self.attributes(caps.get(1).map_or("", |m| m.as_str()));
            let src = match attrs.iter().position(|(name, _)| name == "src") {
                Some(idx) => attrs.remove(idx).1,
                None => {
                    return Err(AssetflowError::InvalidMarkup {
                        path: page.to_path_buf(),
                        reason: format!("'{}' is missing its src attribute", whole.as_str()),
                    })
                }
            };

            if stack.contains(&src) {
                let mut chain = stack.clone();
                chain.push(src);
                return Err(AssetflowError::PartialCycle { chain });
            }

            let fragment = self.read_partial(page, &src)?;
            let fragment = self.substitute(fragment, &mut attrs);

            stack.push(src);
            let rendered = self.expand(page, &fragment, stack)?;
            stack.pop();

            out.push_str(&rendered);
        }

        out.push_str(&html[last..]);
        Ok(out)
    }

    /// End of the closing tag that pairs with the opening tag `open`.
    ///
    /// Only an empty element body is accepted; another opening tag before the
    /// close means this one was left unclosed.
    fn closing_end(&self, page: &Path, html: &str, open: regex::Match<'_>) -> AssetflowResult<usize> {
        let unclosed = || AssetflowError::InvalidMarkup {
            path: page.to_path_buf(),
            reason: format!("'{}' is never closed", open.as_str()),
        };

        let close = self.close_re.find_at(html, open.end()).ok_or_else(unclosed)?;
        match self.open_re.find_at(html, open.end()) {
            Some(next) if next.start() < close.start() => Err(unclosed()),
            _ => Ok(close.end()),
        }
    }

    fn attributes(&self, raw: &str) -> Vec<(String, String)> {
        self.attr_re
            .captures_iter(raw)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str().to_string();
                let value = caps.get(2).or_else(|| caps.get(3))?.as_str().to_string();
                Some((name, value))
            })
            .collect()
    }

    fn read_partial(&self, page: &Path, src: &str) -> AssetflowResult<String> {
        let path = self.dir.join(src);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetflowError::PartialNotFound {
                    partial: src.to_string(),
                    page: page.to_path_buf(),
                    searched: self.dir.display().to_string(),
                })
            }
            Err(e) => Err(AssetflowError::read(path, e)),
        }
    }

    fn substitute(&self, mut fragment: String, attrs: &mut [(String, String)]) -> String {
        // Longest names first so `@@title` never eats the head of `@@titleSuffix`
        attrs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        for (name, value) in attrs.iter() {
            fragment = fragment.replace(&format!("{}{}", self.prefix, name), value);
        }
        fragment
    }
}

#[async_trait]
impl Stage for HtmlPartials {
    fn name(&self) -> &'static str {
        "html-partials"
    }

    async fn apply(&self, mut file: FileObject) -> AssetflowResult<Option<FileObject>> {
        // Partials are read from disk while rendering
        let stage = self.clone();
        let page = file.path.clone();
        let html = file.text()?.to_string();
        let rendered = tokio::task::spawn_blocking(move || stage.render(&page, &html))
            .await
            .map_err(|e| AssetflowError::TaskFailed {
                task: self.name().to_string(),
                message: e.to_string(),
            })??;

        file.set_text(rendered);
        Ok(Some(file))
    }
}
