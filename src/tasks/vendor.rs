// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Vendor task
//!
//! Copies every manifest entry from the dependency store into both the source
//! tree and the output tree. Entries run concurrently; the first failure
//! cancels the rest.

use tokio::task::JoinSet;

use super::{BuildContext, TaskKind};
use crate::config::VendorEntry;
use crate::errors::{AssetflowError, AssetflowResult};
use crate::pipeline::{when, Pipeline, PipelineReport};
use crate::transforms::Uglify;

/// Copy pipeline for one manifest entry
pub fn pipeline(ctx: &BuildContext, entry: &VendorEntry) -> Pipeline {
    let config = &ctx.config;
    let minify = ctx.mode().is_production() && entry.minify;

    ctx.pipeline(format!("vendor:{}", entry.name), &ctx.store_root(), &entry.sources)
        .pipe(when(minify, Uglify))
        .dest(ctx.path(config.source_vendor_dir().join(&entry.dest)))
        .dest(ctx.path(config.output_dir(TaskKind::Vendor).join(&entry.dest)))
}

async fn run_entry(entry: VendorEntry, pipeline: Pipeline) -> AssetflowResult<PipelineReport> {
    let missing = || AssetflowError::VendorArtifactMissing {
        name: entry.name.clone(),
        pattern: entry.sources.join(", "),
    };

    match pipeline.select() {
        Ok(selected) if selected.is_empty() => return Err(missing()),
        Ok(_) => {}
        Err(AssetflowError::FileNotFound { .. }) => return Err(missing()),
        Err(e) => return Err(e),
    }

    let report = pipeline.run().await?;
    tracing::debug!(entry = %entry.name, files = report.processed, "vendored");
    Ok(report)
}

pub async fn run(ctx: &BuildContext) -> AssetflowResult<PipelineReport> {
    let mut entries = JoinSet::new();
    for entry in &ctx.config.vendor {
        entries.spawn(run_entry(entry.clone(), pipeline(ctx, entry)));
    }

    let mut report = PipelineReport::default();
    while let Some(joined) = entries.join_next().await {
        let result = joined.map_err(|e| AssetflowError::TaskFailed {
            task: TaskKind::Vendor.to_string(),
            message: e.to_string(),
        });

        match result.and_then(|r| r) {
            Ok(entry_report) => report.merge(entry_report),
            Err(e) => {
                entries.abort_all();
                return Err(e);
            }
        }
    }

    Ok(report)
}
