// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Image task: a straight copy

use super::{BuildContext, TaskKind};
use crate::errors::AssetflowResult;
use crate::pipeline::{Pipeline, PipelineReport};

pub fn pipeline(ctx: &BuildContext) -> Pipeline {
    ctx.pipeline("image", &ctx.source_root(), &ctx.config.image.sources)
        .dest(ctx.path(ctx.config.output_dir(TaskKind::Image)))
}

pub async fn run(ctx: &BuildContext) -> AssetflowResult<PipelineReport> {
    pipeline(ctx).run().await
}
