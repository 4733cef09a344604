// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Markup task: pages with partials inlined, whitespace collapsed in production

use super::{BuildContext, TaskKind};
use crate::errors::AssetflowResult;
use crate::pipeline::{when, Pipeline, PipelineReport};
use crate::transforms::{CollapseWhitespace, HtmlPartials};

pub fn pipeline(ctx: &BuildContext) -> AssetflowResult<Pipeline> {
    let config = &ctx.config;
    let partials = HtmlPartials::new(
        ctx.path(config.partials_dir()),
        &config.markup.partial_tag,
        &config.markup.variable_prefix,
    )?;

    Ok(ctx
        .pipeline("markup", &ctx.source_root(), &config.markup.sources)
        .pipe(partials)
        .pipe(when(ctx.mode().is_production(), CollapseWhitespace::new()))
        .dest(ctx.path(config.output_dir(TaskKind::Markup))))
}

pub async fn run(ctx: &BuildContext) -> AssetflowResult<PipelineReport> {
    pipeline(ctx)?.run().await
}
