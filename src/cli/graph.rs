// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Graph command - visualize a composition

use colored::Colorize;
use miette::Result;

use super::{CompositionKind, GlobalOptions, GraphFormat};
use crate::graph::{Composition, DagBuilder};
use crate::tasks::describe;

/// Run the graph command
pub async fn run(globals: &GlobalOptions, kind: CompositionKind, format: GraphFormat) -> Result<()> {
    let composition = match kind {
        CompositionKind::Build => Composition::build(),
        CompositionKind::Serve => Composition::serve(),
    };

    let dag = DagBuilder::build(&composition)?;

    let output = match format {
        GraphFormat::Text => dag.to_text(),
        GraphFormat::Dot => dag.to_dot(&composition.name),
        GraphFormat::Mermaid => dag.to_mermaid(),
    };

    print!("{}", output);

    // Stage lists depend on the config and mode
    if globals.verbose && format == GraphFormat::Text {
        let ctx = globals.context()?;
        println!();
        println!("{} ({}):", "Stages".bold(), ctx.mode());
        for task in dag.topological_order() {
            let stages = describe(&ctx, task)?;
            let stages = if stages.is_empty() {
                "-".to_string()
            } else {
                stages.join(" → ")
            };
            println!("  {}: {}", task.name().bold(), stages.dimmed());
        }
    }

    Ok(())
}
