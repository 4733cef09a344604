// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Clean task: empty the output directory, keeping the directory itself

use super::BuildContext;
use crate::errors::{AssetflowError, AssetflowResult};
use crate::pipeline::PipelineReport;

pub async fn run(ctx: &BuildContext) -> AssetflowResult<PipelineReport> {
    let dest = ctx.dest();
    let mut report = PipelineReport::default();

    let mut entries = match tokio::fs::read_dir(&dest).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("{} does not exist, nothing to clean", dest.display());
            return Ok(report);
        }
        Err(e) => return Err(AssetflowError::read(&dest, e)),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AssetflowError::read(&dest, e))?
    {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| AssetflowError::read(&path, e))?;

        let removed = if file_type.is_dir() {
            tokio::fs::remove_dir_all(&path).await
        } else {
            tokio::fs::remove_file(&path).await
        };
        removed.map_err(|e| AssetflowError::write(&path, e))?;

        tracing::trace!("removed {}", path.display());
        report.processed += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildMode;
    use crate::tasks::testing::{context, project};

    #[tokio::test]
    async fn test_empties_but_keeps_dest() {
        let dir = project(&[
            ("dist/index.html", "old"),
            ("dist/css/main.css", "old"),
            ("src/index.html", "keep"),
        ]);
        let ctx = context(&dir, BuildMode::Development);

        let report = run(&ctx).await.unwrap();

        assert_eq!(report.processed, 2);
        let dest = dir.path().join("dist");
        assert!(dest.is_dir());
        assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 0);
        assert!(dir.path().join("src/index.html").exists());
    }

    #[tokio::test]
    async fn test_missing_dest_is_noop() {
        let dir = project(&[]);
        let ctx = context(&dir, BuildMode::Development);

        let report = run(&ctx).await.unwrap();
        assert_eq!(report.processed, 0);
        assert!(!dir.path().join("dist").exists());
    }
}
