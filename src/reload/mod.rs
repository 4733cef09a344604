// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Live reload
//!
//! Tasks report what they wrote to the [`Reloader`], which decides whether
//! connected browsers should inject stylesheets, reload, or do nothing.
//! Events fan out over a broadcast channel; [`server::DevServer`] forwards
//! them to clients as server-sent events.

pub mod server;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

pub use server::DevServer;

/// Message pushed to browsers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadEvent {
    /// Reload the whole page
    Reload,
    /// Swap these stylesheets in place (paths relative to the served root)
    Inject { paths: Vec<String> },
}

impl ReloadEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::Inject { .. } => "inject",
        }
    }
}

/// Which writes of a task are worth telling the browser about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyScope {
    /// Only written paths matching this glob (relative to the output root)
    Matching(String),
    /// Any write triggers a full reload
    All,
    /// Never notify
    None,
}

/// Broadcasts reload events to every connected client
#[derive(Debug, Clone)]
pub struct Reloader {
    tx: broadcast::Sender<ReloadEvent>,
}

impl Reloader {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.tx.subscribe()
    }

    /// Number of connected clients
    pub fn clients(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Unconditional full reload
    pub fn reload(&self) {
        self.send(ReloadEvent::Reload);
    }

    /// Notify clients about files a task wrote under `dest`.
    ///
    /// Returns the event sent, if any.
    pub fn notify(
        &self,
        scope: &NotifyScope,
        dest: &Path,
        written: &[PathBuf],
    ) -> Option<ReloadEvent> {
        let event = event_for(scope, dest, written)?;
        self.send(event.clone());
        Some(event)
    }

    fn send(&self, event: ReloadEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("no reload clients connected");
        }
    }
}

impl Default for Reloader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decide what a set of writes means for the browser
pub fn event_for(scope: &NotifyScope, dest: &Path, written: &[PathBuf]) -> Option<ReloadEvent> {
    if written.is_empty() {
        return None;
    }

    let pattern = match scope {
        NotifyScope::None => return None,
        NotifyScope::All => return Some(ReloadEvent::Reload),
        NotifyScope::Matching(pattern) => match glob::Pattern::new(pattern) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("bad notify pattern '{}': {}", pattern, e);
                return Some(ReloadEvent::Reload);
            }
        },
    };

    let matched: Vec<&Path> = written
        .iter()
        .map(|path| path.strip_prefix(dest).unwrap_or(path))
        .filter(|rel| pattern.matches_path(rel))
        .collect();

    if matched.is_empty() {
        return None;
    }

    let all_css = matched
        .iter()
        .all(|rel| rel.extension().and_then(|e| e.to_str()) == Some("css"));

    if all_css {
        let paths = matched
            .iter()
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            .collect();
        Some(ReloadEvent::Inject { paths })
    } else {
        Some(ReloadEvent::Reload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(paths: &[&str]) -> Vec<PathBuf> {
        paths.iter().map(|p| Path::new("/site/dist").join(p)).collect()
    }

    #[test]
    fn test_css_writes_are_injected() {
        let scope = NotifyScope::Matching("**/*.css".into());
        let event = event_for(&scope, Path::new("/site/dist"), &written(&["css/main.css"]));

        assert_eq!(
            event,
            Some(ReloadEvent::Inject {
                paths: vec!["css/main.css".into()]
            })
        );
    }

    #[test]
    fn test_html_writes_reload() {
        let scope = NotifyScope::Matching("**/*.html".into());
        let event = event_for(
            &scope,
            Path::new("/site/dist"),
            &written(&["index.html", "about/index.html"]),
        );
        assert_eq!(event, Some(ReloadEvent::Reload));
    }

    #[test]
    fn test_unmatched_writes_are_silent() {
        let scope = NotifyScope::Matching("**/*.js".into());
        let event = event_for(&scope, Path::new("/site/dist"), &written(&["css/main.css"]));
        assert_eq!(event, None);
    }

    #[test]
    fn test_all_and_none_scopes() {
        let dest = Path::new("/site/dist");
        let files = written(&["images/logo.png"]);

        assert_eq!(event_for(&NotifyScope::All, dest, &files), Some(ReloadEvent::Reload));
        assert_eq!(event_for(&NotifyScope::None, dest, &files), None);
        assert_eq!(event_for(&NotifyScope::All, dest, &[]), None);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let reloader = Reloader::new();
        let mut rx = reloader.subscribe();

        reloader.reload();
        assert_eq!(rx.recv().await.unwrap(), ReloadEvent::Reload);

        let sent = reloader.notify(
            &NotifyScope::Matching("**/*.css".into()),
            Path::new("/site/dist"),
            &written(&["css/a.css"]),
        );
        assert_eq!(rx.recv().await.unwrap(), sent.unwrap());
    }

    #[test]
    fn test_no_clients_is_fine() {
        let reloader = Reloader::new();
        assert_eq!(reloader.clients(), 0);
        reloader.reload();
    }

    #[test]
    fn test_event_json() {
        let json = serde_json::to_string(&ReloadEvent::Inject {
            paths: vec!["css/main.css".into()],
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"inject","paths":["css/main.css"]}"#);
        assert_eq!(
            serde_json::to_string(&ReloadEvent::Reload).unwrap(),
            r#"{"type":"reload"}"#
        );
    }
}
