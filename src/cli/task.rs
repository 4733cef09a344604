// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Single-task commands (`html`, `css`, `js`, `img`, `modules`, `clean`)

use miette::Result;

use super::GlobalOptions;
use crate::graph::{Composition, TaskExecutor};
use crate::tasks::TaskKind;

/// Run one task on its own
pub async fn run(globals: &GlobalOptions, task: TaskKind) -> Result<()> {
    let ctx = globals.context()?;

    TaskExecutor::new(globals.execution_options())
        .execute(ctx, &Composition::single(task))
        .await?;

    Ok(())
}
