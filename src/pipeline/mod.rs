// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! File pipelines
//!
//! A pipeline selects files with a [`SourceSet`], pushes each one through an
//! ordered list of [`Stage`]s and writes the survivors to every destination.

mod file;
mod hash;
mod source;
mod stage;

pub use file::{FileObject, SourceMap};
pub use hash::{hash_bytes, is_unchanged};
pub use source::{glob_base, is_glob, SelectedFile, SourceSet};
pub use stage::{when, Stage, When};

use std::path::{Path, PathBuf};

use crate::errors::{AssetflowError, AssetflowResult};

/// Outcome of one pipeline run
#[derive(Debug, Default, Clone)]
pub struct PipelineReport {
    /// Files read from the source selector
    pub processed: usize,
    /// Every destination path produced, in write order
    pub outputs: Vec<PathBuf>,
    /// Subset of `outputs` whose bytes actually changed
    pub changed: Vec<PathBuf>,
    /// Set when a recoverable error stopped the run early
    pub abandoned: Option<String>,
}

impl PipelineReport {
    /// Fold another report into this one
    pub fn merge(&mut self, other: PipelineReport) {
        self.processed += other.processed;
        self.outputs.extend(other.outputs);
        self.changed.extend(other.changed);
        if self.abandoned.is_none() {
            self.abandoned = other.abandoned;
        }
    }
}

/// Source selector → stages → destinations
pub struct Pipeline {
    name: String,
    root: PathBuf,
    sources: SourceSet,
    stages: Vec<Box<dyn Stage>>,
    destinations: Vec<PathBuf>,
}

impl Pipeline {
    /// Start a pipeline reading `sources` relative to `root`
    pub fn src(name: impl Into<String>, root: impl Into<PathBuf>, sources: SourceSet) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            sources,
            stages: Vec::new(),
            destinations: Vec::new(),
        }
    }

    /// Append a stage
    pub fn pipe<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append a destination directory (relative to the root, or absolute)
    pub fn dest(mut self, dir: impl AsRef<Path>) -> Self {
        self.destinations.push(self.root.join(dir));
        self
    }

    /// Names of the stages that will actually run
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.name())
            .collect()
    }

    /// Select all sources without reading or transforming them
    pub fn select(&self) -> AssetflowResult<Vec<SelectedFile>> {
        self.sources.resolve(&self.root)
    }

    /// Run the pipeline to completion.
    ///
    /// A recoverable stage error is logged and ends the run with
    /// `abandoned` set; files already written stay as they are. Any other
    /// error is returned.
    pub async fn run(&self) -> AssetflowResult<PipelineReport> {
        let selected = self.select()?;
        let mut report = PipelineReport::default();

        tracing::debug!(
            pipeline = %self.name,
            files = selected.len(),
            stages = ?self.stage_names(),
            "starting pipeline"
        );

        for entry in selected {
            let file = FileObject::read(&entry.base, &entry.path).await?;
            report.processed += 1;

            match self.transform(file).await {
                Ok(Some(file)) => self.write(&file, &mut report).await?,
                Ok(None) => {}
                Err(e) if e.is_recoverable() => {
                    tracing::error!(pipeline = %self.name, "{}", e);
                    report.abandoned = Some(e.to_string());
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    async fn transform(&self, mut file: FileObject) -> AssetflowResult<Option<FileObject>> {
        for stage in &self.stages {
            match stage.apply(file).await? {
                Some(next) => file = next,
                None => {
                    tracing::trace!(stage = stage.name(), "file dropped");
                    return Ok(None);
                }
            }
        }
        Ok(Some(file))
    }

    async fn write(&self, file: &FileObject, report: &mut PipelineReport) -> AssetflowResult<()> {
        for dest in &self.destinations {
            let target = dest.join(file.relative());

            if is_unchanged(&target, &file.contents).await {
                tracing::trace!("unchanged {}", target.display());
            } else {
                if let Some(parent) = target.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| AssetflowError::write(parent, e))?;
                }
                tokio::fs::write(&target, &file.contents)
                    .await
                    .map_err(|e| AssetflowError::write(&target, e))?;
                tracing::debug!("wrote {}", target.display());
                report.changed.push(target.clone());
            }

            report.outputs.push(target);
        }
        Ok(())
    }
}
