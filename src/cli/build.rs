// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Build command - clean, then run every task

use miette::Result;

use super::GlobalOptions;
use crate::graph::{Composition, TaskExecutor};
use crate::utils::print_warning;

/// Run the build command
pub async fn run(globals: &GlobalOptions, parallel: bool) -> Result<()> {
    let ctx = globals.context()?;
    let composition = Composition::build().concurrent(parallel);

    let result = TaskExecutor::new(globals.execution_options())
        .execute(ctx, &composition)
        .await?;

    for task in result.abandoned() {
        print_warning(&format!(
            "{} was abandoned; its previous output was kept",
            task
        ));
    }

    Ok(())
}
