// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Pipeline stages

use async_trait::async_trait;

use super::FileObject;
use crate::errors::AssetflowResult;

/// One transformation step.
///
/// Returning `Ok(None)` drops the file from the stream (e.g. Sass partials).
#[async_trait]
pub trait Stage: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether the stage does anything in this run
    fn is_active(&self) -> bool {
        true
    }

    /// Transform a single file
    async fn apply(&self, file: FileObject) -> AssetflowResult<Option<FileObject>>;
}

/// Runs the wrapped stage only when enabled; otherwise passes files through
pub struct When<S> {
    enabled: bool,
    inner: S,
}

/// Wrap `stage` so it only runs when `enabled` is true
pub fn when<S: Stage>(enabled: bool, stage: S) -> When<S> {
    When {
        enabled,
        inner: stage,
    }
}

#[async_trait]
impl<S: Stage> Stage for When<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn is_active(&self) -> bool {
        self.enabled && self.inner.is_active()
    }

    async fn apply(&self, file: FileObject) -> AssetflowResult<Option<FileObject>> {
        if self.enabled {
            self.inner.apply(file).await
        } else {
            Ok(Some(file))
        }
    }
}
