// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Stylesheet task
//!
//! Development builds carry inline source maps; production builds are
//! minified. A Sass error abandons the run instead of failing it, so the last
//! good CSS stays in place while the watcher keeps going.

use super::{BuildContext, TaskKind};
use crate::errors::AssetflowResult;
use crate::pipeline::{when, Pipeline, PipelineReport};
use crate::transforms::{CssMinify, SassCompile, SourceMapInit, SourceMapWrite};

pub fn pipeline(ctx: &BuildContext) -> Pipeline {
    let config = &ctx.config;
    let production = ctx.mode().is_production();
    let include_paths = config
        .stylesheet
        .include_paths
        .iter()
        .map(|p| ctx.path(p))
        .chain(std::iter::once(ctx.store_root()))
        .collect();

    ctx.pipeline("stylesheet", &ctx.source_root(), &config.stylesheet.sources)
        .pipe(when(!production, SourceMapInit))
        .pipe(SassCompile::new(include_paths))
        .pipe(when(!production, SourceMapWrite))
        .pipe(when(production, CssMinify))
        .dest(ctx.path(config.output_dir(TaskKind::Stylesheet)))
}

pub async fn run(ctx: &BuildContext) -> AssetflowResult<PipelineReport> {
    pipeline(ctx).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildMode;
    use crate::tasks::testing::{context, project, read};

    const MAIN: &str = "@import 'variables';\n\nbody {\n  color: $text;\n}\n";
    const VARIABLES: &str = "$text: #333;\n";

    #[tokio::test]
    async fn test_development_has_source_map() {
        let dir = project(&[
            ("src/scss/main.scss", MAIN),
            ("src/scss/_variables.scss", VARIABLES),
        ]);
        let ctx = context(&dir, BuildMode::Development);

        let report = run(&ctx).await.unwrap();
        assert_eq!(report.outputs, vec![dir.path().join("dist/css/main.css")]);

        let css = read(&dir, "dist/css/main.css");
        assert!(css.contains("color: #333"));
        assert!(css.contains("sourceMappingURL=data:application/json"));
        assert!(!dir.path().join("dist/css/_variables.css").exists());
    }

    #[tokio::test]
    async fn test_production_is_minified_without_map() {
        let dir = project(&[
            ("src/scss/main.scss", MAIN),
            ("src/scss/_variables.scss", VARIABLES),
        ]);
        let ctx = context(&dir, BuildMode::Production);

        run(&ctx).await.unwrap();

        let css = read(&dir, "dist/css/main.css");
        assert!(css.contains("body{color:#333}"));
        assert!(!css.contains('\n'));
        assert!(!css.contains("sourceMappingURL"));
    }

    #[tokio::test]
    async fn test_broken_sass_leaves_previous_output() {
        let dir = project(&[("src/scss/main.scss", "a { color: red; }\n")]);
        let ctx = context(&dir, BuildMode::Production);
        run(&ctx).await.unwrap();
        let before = read(&dir, "dist/css/main.css");

        std::fs::write(dir.path().join("src/scss/main.scss"), "a { color: red;\n").unwrap();
        let report = run(&ctx).await.unwrap();

        assert!(report.abandoned.is_some());
        assert_eq!(read(&dir, "dist/css/main.css"), before);
    }
}
