// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Build tasks
//!
//! Each task is a function of an immutable [`BuildContext`]. After a task
//! finishes, the files it actually changed are reported to the reloader using
//! the task's [`NotifyScope`].

pub mod clean;
pub mod image;
pub mod markup;
pub mod script;
pub mod stylesheet;
pub mod vendor;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{BuildConfig, BuildMode};
use crate::errors::{AssetflowError, AssetflowResult};
use crate::pipeline::{Pipeline, PipelineReport};
use crate::reload::{NotifyScope, Reloader};

/// The tasks a project can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Clean,
    Markup,
    Stylesheet,
    Script,
    Image,
    Vendor,
}

impl TaskKind {
    pub const ALL: [TaskKind; 6] = [
        TaskKind::Clean,
        TaskKind::Markup,
        TaskKind::Stylesheet,
        TaskKind::Script,
        TaskKind::Image,
        TaskKind::Vendor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Markup => "markup",
            Self::Stylesheet => "stylesheet",
            Self::Script => "script",
            Self::Image => "image",
            Self::Vendor => "vendor",
        }
    }

    /// Short command-line name
    pub fn command(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Markup => "html",
            Self::Stylesheet => "css",
            Self::Script => "js",
            Self::Image => "img",
            Self::Vendor => "modules",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Clean => "empty the output directory",
            Self::Markup => "inline partials into pages",
            Self::Stylesheet => "compile Sass to CSS",
            Self::Script => "bundle script imports",
            Self::Image => "copy images",
            Self::Vendor => "copy third-party artifacts",
        }
    }

    /// Which of this task's writes are pushed to browsers
    pub fn notify_scope(self) -> NotifyScope {
        match self {
            Self::Markup => NotifyScope::Matching("**/*.html".into()),
            Self::Stylesheet => NotifyScope::Matching("**/*.css".into()),
            Self::Script => NotifyScope::Matching("**/*.js".into()),
            Self::Image => NotifyScope::All,
            Self::Clean | Self::Vendor => NotifyScope::None,
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TaskKind {
    type Err = AssetflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clean" | "del" => Ok(Self::Clean),
            "markup" | "html" => Ok(Self::Markup),
            "stylesheet" | "css" => Ok(Self::Stylesheet),
            "script" | "js" => Ok(Self::Script),
            "image" | "images" | "img" => Ok(Self::Image),
            "vendor" | "modules" => Ok(Self::Vendor),
            _ => Err(AssetflowError::UnknownTask {
                name: s.to_string(),
            }),
        }
    }
}

/// Everything a task needs, fixed for the whole run
#[derive(Debug)]
pub struct BuildContext {
    /// Project root; all configured paths hang off it
    pub root: PathBuf,
    pub config: BuildConfig,
    pub reloader: Reloader,
}

impl BuildContext {
    pub fn new(root: impl Into<PathBuf>, config: BuildConfig) -> Arc<Self> {
        Arc::new(Self {
            root: root.into(),
            config,
            reloader: Reloader::new(),
        })
    }

    pub fn mode(&self) -> BuildMode {
        self.config.mode
    }

    /// Resolve a config path against the project root
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Absolute output root
    pub fn dest(&self) -> PathBuf {
        self.path(&self.config.paths.dest)
    }

    /// Absolute source root; task sources are relative to it
    pub fn source_root(&self) -> PathBuf {
        self.path(&self.config.paths.src)
    }

    /// Absolute dependency store; vendor sources are relative to it
    pub fn store_root(&self) -> PathBuf {
        self.path(&self.config.paths.store)
    }

    /// Start a pipeline over source patterns relative to `base`
    pub(crate) fn pipeline(
        &self,
        name: impl Into<String>,
        base: &Path,
        sources: &[String],
    ) -> Pipeline {
        Pipeline::src(
            name,
            base,
            crate::pipeline::SourceSet::new(sources.iter().cloned()),
        )
    }
}

/// Outcome of one task run
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub task: TaskKind,
    pub processed: usize,
    pub outputs: Vec<PathBuf>,
    pub changed: Vec<PathBuf>,
    /// Reason the task gave up early without failing
    pub abandoned: Option<String>,
    pub duration: Duration,
}

impl TaskReport {
    fn new(task: TaskKind, report: PipelineReport, duration: Duration) -> Self {
        Self {
            task,
            processed: report.processed,
            outputs: report.outputs,
            changed: report.changed,
            abandoned: report.abandoned,
            duration,
        }
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned.is_some()
    }
}

/// Run one task and notify reload clients about what it changed
pub async fn run_task(ctx: &BuildContext, task: TaskKind) -> AssetflowResult<TaskReport> {
    let start = Instant::now();
    tracing::debug!(task = %task, mode = %ctx.mode(), "running task");

    let report = match task {
        TaskKind::Clean => clean::run(ctx).await?,
        TaskKind::Markup => markup::run(ctx).await?,
        TaskKind::Stylesheet => stylesheet::run(ctx).await?,
        TaskKind::Script => script::run(ctx).await?,
        TaskKind::Image => image::run(ctx).await?,
        TaskKind::Vendor => vendor::run(ctx).await?,
    };

    if let Some(event) = ctx
        .reloader
        .notify(&task.notify_scope(), &ctx.dest(), &report.changed)
    {
        tracing::debug!(task = %task, event = event.name(), "notified clients");
    }

    Ok(TaskReport::new(task, report, start.elapsed()))
}

/// Stage names of a task's pipelines, for display
pub fn describe(ctx: &BuildContext, task: TaskKind) -> AssetflowResult<Vec<&'static str>> {
    let stages = match task {
        TaskKind::Clean => Vec::new(),
        TaskKind::Markup => markup::pipeline(ctx)?.stage_names(),
        TaskKind::Stylesheet => stylesheet::pipeline(ctx).stage_names(),
        TaskKind::Script => script::pipeline(ctx).stage_names(),
        TaskKind::Image => image::pipeline(ctx).stage_names(),
        TaskKind::Vendor => ctx
            .config
            .vendor
            .first()
            .map(|entry| vendor::pipeline(ctx, entry).stage_names())
            .unwrap_or_default(),
    };
    Ok(stages)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::reload::ReloadEvent;

    #[test]
    fn test_task_names_and_aliases() {
        for task in TaskKind::ALL {
            assert_eq!(task.name().parse::<TaskKind>().unwrap(), task);
            assert_eq!(task.command().parse::<TaskKind>().unwrap(), task);
        }
        assert_eq!("del".parse::<TaskKind>().unwrap(), TaskKind::Clean);
        assert_eq!("images".parse::<TaskKind>().unwrap(), TaskKind::Image);
        assert!(matches!(
            "fonts".parse::<TaskKind>(),
            Err(AssetflowError::UnknownTask { .. })
        ));
    }

    #[test]
    fn test_notify_scopes() {
        assert_eq!(
            TaskKind::Stylesheet.notify_scope(),
            NotifyScope::Matching("**/*.css".into())
        );
        assert_eq!(TaskKind::Image.notify_scope(), NotifyScope::All);
        assert_eq!(TaskKind::Vendor.notify_scope(), NotifyScope::None);
    }

    #[tokio::test]
    async fn test_run_task_notifies_changed_files_only() {
        let dir = project(&[("src/js/app.js", "run();")]);
        let ctx = context(&dir, BuildMode::Development);
        let mut rx = ctx.reloader.subscribe();

        let first = run_task(&ctx, TaskKind::Script).await.unwrap();
        assert_eq!(first.changed.len(), 1);
        assert_eq!(rx.try_recv().unwrap(), ReloadEvent::Reload);

        let second = run_task(&ctx, TaskKind::Script).await.unwrap();
        assert!(second.changed.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stylesheet_changes_are_injected() {
        let dir = project(&[("src/scss/main.scss", "$c: red;\na { color: $c; }\n")]);
        let ctx = context(&dir, BuildMode::Production);
        let mut rx = ctx.reloader.subscribe();

        run_task(&ctx, TaskKind::Stylesheet).await.unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            ReloadEvent::Inject {
                paths: vec!["css/main.css".into()]
            }
        );
    }

    #[test]
    fn test_describe_follows_mode() {
        let dir = project(&[]);
        let dev = context(&dir, BuildMode::Development);
        let prod = context(&dir, BuildMode::Production);

        assert_eq!(
            describe(&dev, TaskKind::Stylesheet).unwrap(),
            vec!["sourcemaps-init", "sass", "sourcemaps-write"]
        );
        assert_eq!(
            describe(&prod, TaskKind::Stylesheet).unwrap(),
            vec!["sass", "cssmin"]
        );
        assert!(describe(&prod, TaskKind::Clean).unwrap().is_empty());
    }
}
