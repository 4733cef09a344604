// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Script task: import bundling, minified in production

use super::{BuildContext, TaskKind};
use crate::errors::AssetflowResult;
use crate::pipeline::{when, Pipeline, PipelineReport};
use crate::transforms::{ScriptImports, Uglify};

pub fn pipeline(ctx: &BuildContext) -> Pipeline {
    let config = &ctx.config;

    ctx.pipeline("script", &ctx.source_root(), &config.script.sources)
        .pipe(ScriptImports::new(config.script.hide_console))
        .pipe(when(ctx.mode().is_production(), Uglify))
        .dest(ctx.path(config.output_dir(TaskKind::Script)))
}

pub async fn run(ctx: &BuildContext) -> AssetflowResult<PipelineReport> {
    pipeline(ctx).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildMode;
    use crate::tasks::testing::{context, project, read};

    const APP: &str = "@import 'lib/dom.js';\n\nfunction start() {\n    const header = select('header');\n    header.classList.add('ready');\n}\n\nstart();\n";
    const DOM: &str = "function select(selector) {\n    return document.querySelector(selector);\n}\n";

    #[tokio::test]
    async fn test_development_bundles_imports() {
        let dir = project(&[("src/js/app.js", APP), ("src/js/lib/dom.js", DOM)]);
        let ctx = context(&dir, BuildMode::Development);

        let report = run(&ctx).await.unwrap();
        assert_eq!(report.outputs, vec![dir.path().join("dist/js/app.js")]);

        let js = read(&dir, "dist/js/app.js");
        assert!(js.starts_with("function select(selector)"));
        assert!(!js.contains("@import"));
        assert_eq!(js.matches("function select").count(), 1);
    }

    #[tokio::test]
    async fn test_repeat_builds_are_identical() {
        let dir = project(&[("src/js/app.js", APP), ("src/js/lib/dom.js", DOM)]);
        let ctx = context(&dir, BuildMode::Development);

        run(&ctx).await.unwrap();
        let first = read(&dir, "dist/js/app.js");
        let report = run(&ctx).await.unwrap();

        assert_eq!(read(&dir, "dist/js/app.js"), first);
        assert!(report.changed.is_empty());
    }

    #[tokio::test]
    async fn test_production_minifies() {
        let dir = project(&[("src/js/app.js", APP), ("src/js/lib/dom.js", DOM)]);
        let ctx = context(&dir, BuildMode::Production);

        run(&ctx).await.unwrap();

        let js = read(&dir, "dist/js/app.js");
        assert!(js.len() < APP.len() + DOM.len());
        assert!(!js.contains("\n    "));
    }

    #[tokio::test]
    async fn test_windows_line_endings_are_bundled() {
        let dir = project(&[
            ("src/js/app.js", "@import 'util.js';\r\nutil();\r\n"),
            ("src/js/util.js", "function util() {}\r\n"),
        ]);
        let ctx = context(&dir, BuildMode::Development);

        run(&ctx).await.unwrap();

        let js = read(&dir, "dist/js/app.js");
        assert!(!js.contains("@import"));
        assert!(js.starts_with("function util() {}"));
    }

    #[tokio::test]
    async fn test_project_root_with_glob_characters() {
        let dir = project(&[("site[v2]/src/js/app.js", "run();")]);
        let config = crate::config::BuildConfig {
            vendor: Vec::new(),
            ..Default::default()
        };
        let ctx = BuildContext::new(dir.path().join("site[v2]"), config);

        let report = run(&ctx).await.unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(read(&dir, "site[v2]/dist/js/app.js"), "run();");
    }
}
