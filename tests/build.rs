// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! End-to-end builds of small projects through the library API

use std::path::Path;
use std::sync::Arc;

use assetflow::graph::ExecutionOptions;
use assetflow::{
    BuildConfig, BuildContext, BuildMode, Composition, TaskExecutor, TaskKind,
};
use tempfile::TempDir;

const SCRIPT: &str = "\
function greet(name) {
    const message = 'Hello, ' + name;
    return message;
}
greet('world');
";

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, content).unwrap();
    }
    dir
}

fn site() -> TempDir {
    project(&[
        (
            "src/index.html",
            "<html><body><partial src=\"nav.html\"></partial><p>home</p></body></html>",
        ),
        ("src/partials/nav.html", "<nav>menu</nav>"),
        ("src/scss/main.scss", "$fg: #333;\nbody { color: $fg; }\n"),
        ("src/js/app.js", SCRIPT),
        ("src/images/logo.svg", "<svg/>"),
    ])
}

fn context(dir: &TempDir, mode: BuildMode) -> Arc<BuildContext> {
    let config = BuildConfig {
        vendor: Vec::new(),
        ..BuildConfig::default()
    };
    BuildContext::new(dir.path(), config.with_mode(mode))
}

fn executor() -> TaskExecutor {
    TaskExecutor::new(ExecutionOptions {
        quiet: true,
        verbose: false,
    })
}

fn files_under(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = glob::glob(&format!("{}/**/*", root.display()))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .map(|p| {
            p.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn build_leaves_only_produced_files() {
    let dir = site();
    std::fs::create_dir_all(dir.path().join("dist/old")).unwrap();
    std::fs::write(dir.path().join("dist/old/stale.css"), "x").unwrap();

    let result = executor()
        .execute(context(&dir, BuildMode::Development), &Composition::build())
        .await
        .unwrap();

    assert!(result.success());
    assert_eq!(
        files_under(&dir.path().join("dist")),
        vec![
            "css/main.css",
            "images/logo.svg",
            "index.html",
            "js/app.js",
        ]
    );

    let html = std::fs::read_to_string(dir.path().join("dist/index.html")).unwrap();
    assert!(html.contains("<nav>menu</nav>"));
    assert!(!html.contains("<partial"));
}

#[tokio::test]
async fn broken_stylesheet_keeps_previous_output() {
    let dir = site();
    let ctx = context(&dir, BuildMode::Development);

    assetflow::run_task(&ctx, TaskKind::Stylesheet).await.unwrap();
    let before = std::fs::read_to_string(dir.path().join("dist/css/main.css")).unwrap();

    std::fs::write(dir.path().join("src/scss/main.scss"), "body { color: $fg;\n").unwrap();
    let serve = Composition::serve();
    let result = executor().execute(ctx, &serve).await.unwrap();

    assert!(result.success());
    assert_eq!(result.abandoned(), vec![TaskKind::Stylesheet]);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("dist/css/main.css")).unwrap(),
        before
    );
    assert!(dir.path().join("dist/index.html").exists());
    assert!(dir.path().join("dist/js/app.js").exists());
}

#[tokio::test]
async fn production_build_minifies_in_place() {
    let dir = site();

    executor()
        .execute(context(&dir, BuildMode::Production), &Composition::build())
        .await
        .unwrap();

    let script = std::fs::read_to_string(dir.path().join("dist/js/app.js")).unwrap();
    assert!(!script.is_empty());
    assert!(script.len() < SCRIPT.len());

    let css = std::fs::read_to_string(dir.path().join("dist/css/main.css")).unwrap();
    assert!(!css.contains("sourceMappingURL"));
    assert!(!css.contains("\n  "));
}

#[tokio::test]
async fn rebuild_without_changes_writes_nothing() {
    let dir = site();
    let ctx = context(&dir, BuildMode::Development);

    let first = assetflow::run_task(&ctx, TaskKind::Script).await.unwrap();
    assert_eq!(first.changed.len(), 1);

    let second = assetflow::run_task(&ctx, TaskKind::Script).await.unwrap();
    assert_eq!(second.outputs.len(), 1);
    assert!(second.changed.is_empty());
}
