// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Watch coordinator
//!
//! Maps debounced file changes under the source tree to their bound tasks.
//! Each binding runs under its own lock, so a binding's task and its
//! follow-up reload never interleave with another run of the same binding.
//! Different bindings run concurrently.

use colored::Colorize;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::config::WatchBindingConfig;
use crate::errors::{AssetflowError, AssetflowResult};
use crate::tasks::{run_task, BuildContext, TaskKind};
use crate::utils::{format_duration, plural, print_error, print_info, print_success};

/// A compiled glob → task binding
#[derive(Debug)]
pub struct WatchBinding {
    pub pattern: glob::Pattern,
    pub task: TaskKind,
    /// Force a full reload after the task
    pub reload: bool,
    lock: Mutex<()>,
}

impl WatchBinding {
    pub fn new(config: &WatchBindingConfig) -> AssetflowResult<Self> {
        Ok(Self {
            pattern: glob::Pattern::new(&config.pattern)?,
            task: config.task,
            reload: config.reload,
            lock: Mutex::new(()),
        })
    }
}

pub struct WatchCoordinator {
    ctx: Arc<BuildContext>,
    /// Watched source root, as configured and as the OS reports it
    source_root: PathBuf,
    canonical_root: PathBuf,
    bindings: Vec<Arc<WatchBinding>>,
    ignore: Vec<glob::Pattern>,
}

impl WatchCoordinator {
    pub fn new(ctx: Arc<BuildContext>) -> AssetflowResult<Self> {
        let watch = &ctx.config.watch;

        let bindings = watch
            .bindings
            .iter()
            .map(|b| WatchBinding::new(b).map(Arc::new))
            .collect::<AssetflowResult<Vec<_>>>()?;

        let ignore = watch
            .ignore
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let source_root = ctx.source_root();
        let canonical_root =
            std::fs::canonicalize(&source_root).unwrap_or_else(|_| source_root.clone());

        Ok(Self {
            ctx,
            source_root,
            canonical_root,
            bindings,
            ignore,
        })
    }

    pub fn bindings(&self) -> &[Arc<WatchBinding>] {
        &self.bindings
    }

    /// Event path relative to the source root
    pub fn relative(&self, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(&self.canonical_root)
            .or_else(|_| path.strip_prefix(&self.source_root))
            .ok()
            .map(Path::to_path_buf)
    }

    pub fn is_ignored(&self, relative: &Path) -> bool {
        self.ignore.iter().any(|p| p.matches_path(relative))
    }

    /// Indices of the bindings a source-relative path triggers
    pub fn matching_bindings(&self, relative: &Path) -> Vec<usize> {
        if self.is_ignored(relative) {
            return Vec::new();
        }

        self.bindings
            .iter()
            .enumerate()
            .filter(|(_, b)| b.pattern.matches_path(relative))
            .map(|(i, _)| i)
            .collect()
    }

    /// Start every binding triggered by a batch of changed paths.
    ///
    /// Each binding runs at most once per batch.
    pub fn dispatch<I>(&self, changed: I) -> Vec<JoinHandle<()>>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut triggered: BTreeMap<usize, Vec<PathBuf>> = BTreeMap::new();

        for path in changed {
            let Some(relative) = self.relative(&path) else {
                continue;
            };
            for index in self.matching_bindings(&relative) {
                triggered.entry(index).or_default().push(relative.clone());
            }
        }

        triggered
            .into_iter()
            .map(|(index, paths)| {
                let binding = Arc::clone(&self.bindings[index]);
                let ctx = Arc::clone(&self.ctx);
                tracing::debug!(task = %binding.task, paths = ?paths, "change detected");
                tokio::spawn(run_binding(ctx, binding))
            })
            .collect()
    }

    /// Watch the source tree until the process ends
    pub async fn run(self) -> AssetflowResult<()> {
        let src = self.source_root.clone();
        let debounce = Duration::from_millis(self.ctx.config.watch.debounce_ms);
        let (tx, mut rx) = mpsc::unbounded_channel::<DebounceEventResult>();

        let mut debouncer = new_debouncer(debounce, move |result: DebounceEventResult| {
            let _ = tx.send(result);
        })
        .map_err(|e| AssetflowError::Watch {
            message: format!("failed to create file watcher: {}", e),
        })?;

        debouncer
            .watcher()
            .watch(&src, RecursiveMode::Recursive)
            .map_err(|e| AssetflowError::Watch {
                message: format!("failed to watch {}: {}", src.display(), e),
            })?;

        print_info(&format!(
            "Watching {} ({})",
            src.display(),
            plural(self.bindings.len(), "binding")
        ));

        while let Some(result) = rx.recv().await {
            match result {
                Ok(events) => {
                    let changed = events
                        .into_iter()
                        .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
                        .map(|e| e.path);
                    self.dispatch(changed);
                }
                Err(e) => tracing::warn!("watch error: {:?}", e),
            }
        }

        Ok(())
    }
}

/// Run a binding's task and its reload under the binding lock
async fn run_binding(ctx: Arc<BuildContext>, binding: Arc<WatchBinding>) {
    let _guard = binding.lock.lock().await;

    match run_task(&ctx, binding.task).await {
        Ok(report) => {
            print_success(&format!(
                "{} ({}) {}",
                binding.task.name().bold(),
                format_duration(report.duration),
                format!("[{} written]", plural(report.changed.len(), "file")).dimmed()
            ));
            if binding.reload {
                ctx.reloader.reload();
            }
        }
        Err(e) => {
            print_error(&format!("{} failed", binding.task.name().bold()));
            tracing::error!(task = %binding.task, "{}", e);
        }
    }
}
