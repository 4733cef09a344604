// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Composition executor
//!
//! Runs the tasks of a composition level by level in dependency order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::Colorize;
use tokio::task::JoinSet;

use super::{Composition, DagBuilder, FailurePolicy};
use crate::errors::{AssetflowError, AssetflowResult};
use crate::tasks::{run_task, BuildContext, TaskKind, TaskReport};
use crate::utils::{format_duration, plural, TaskSpinner};

/// Composition execution options
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Skip the plan and per-task lines
    pub quiet: bool,
    /// List every file a task changed
    pub verbose: bool,
}

/// Result of executing a composition
#[derive(Debug, Default)]
pub struct CompositionResult {
    /// Reports of tasks that finished, in completion order
    pub reports: Vec<TaskReport>,
    /// Isolated failures
    pub failures: Vec<(TaskKind, String)>,
    pub duration: Duration,
}

impl CompositionResult {
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn report(&self, task: TaskKind) -> Option<&TaskReport> {
        self.reports.iter().find(|r| r.task == task)
    }

    /// Tasks that gave up early on a recoverable error
    pub fn abandoned(&self) -> Vec<TaskKind> {
        self.reports
            .iter()
            .filter(|r| r.is_abandoned())
            .map(|r| r.task)
            .collect()
    }
}

/// Composition executor
#[derive(Debug, Clone, Default)]
pub struct TaskExecutor {
    options: ExecutionOptions,
}

impl TaskExecutor {
    pub fn new(options: ExecutionOptions) -> Self {
        Self { options }
    }

    /// Execute a composition
    pub async fn execute(
        &self,
        ctx: Arc<BuildContext>,
        composition: &Composition,
    ) -> AssetflowResult<CompositionResult> {
        let start = Instant::now();

        let dag = DagBuilder::build(composition)?;
        let levels = dag.levels();

        if !self.options.quiet {
            self.print_execution_plan(&ctx, composition, &dag);
        }

        let spinner = if self.options.quiet {
            TaskSpinner::hidden()
        } else {
            TaskSpinner::start(&format!("{}...", composition.name))
        };

        let mut result = CompositionResult::default();
        let mut outcome = Ok(());
        for level in &levels {
            outcome = self
                .run_level(&ctx, composition, level, &spinner, &mut result)
                .await;
            if outcome.is_err() {
                break;
            }
        }

        spinner.finish();
        result.duration = start.elapsed();

        if let Err(e) = outcome {
            if !self.options.quiet {
                println!();
                println!(
                    "{}",
                    format!(
                        "{} failed after {}",
                        composition.name,
                        format_duration(result.duration)
                    )
                    .red()
                );
            }
            return Err(e);
        }

        if !self.options.quiet {
            self.print_summary(composition, &result);
        }

        Ok(result)
    }

    async fn run_level(
        &self,
        ctx: &Arc<BuildContext>,
        composition: &Composition,
        level: &[TaskKind],
        spinner: &TaskSpinner,
        result: &mut CompositionResult,
    ) -> AssetflowResult<()> {
        if !composition.concurrent || level.len() < 2 {
            for &task in level {
                spinner.set_message(&format!("{}...", task));
                let outcome = run_task(ctx, task).await;
                self.record(task, outcome, composition.policy, spinner, result)?;
            }
            return Ok(());
        }

        let names: Vec<&str> = level.iter().map(|t| t.name()).collect();
        spinner.set_message(&format!("{}...", names.join(", ")));

        let mut running = JoinSet::new();
        for &task in level {
            let ctx = Arc::clone(ctx);
            running.spawn(async move { (task, run_task(&ctx, task).await) });
        }

        while let Some(joined) = running.join_next().await {
            let (task, outcome) = joined.map_err(|e| AssetflowError::TaskFailed {
                task: composition.name.clone(),
                message: e.to_string(),
            })?;

            if let Err(e) = self.record(task, outcome, composition.policy, spinner, result) {
                running.abort_all();
                return Err(e);
            }
        }

        Ok(())
    }

    /// Print a task outcome and apply the failure policy
    fn record(
        &self,
        task: TaskKind,
        outcome: AssetflowResult<TaskReport>,
        policy: FailurePolicy,
        spinner: &TaskSpinner,
        result: &mut CompositionResult,
    ) -> AssetflowResult<()> {
        let report = match outcome {
            Ok(report) => report,
            Err(e) => {
                if !self.options.quiet {
                    spinner.println(format!("  {} {} failed", "✗".red(), task.name().bold()));
                }
                return match policy {
                    FailurePolicy::FailFast => Err(e),
                    FailurePolicy::Isolate => {
                        tracing::error!(task = %task, "{}", e);
                        result.failures.push((task, e.to_string()));
                        Ok(())
                    }
                };
            }
        };

        if !self.options.quiet {
            if report.is_abandoned() {
                spinner.println(format!(
                    "  {} {} {}",
                    "⚠".yellow(),
                    task.name().bold(),
                    "(abandoned, previous output kept)".dimmed()
                ));
            } else {
                spinner.println(format!(
                    "  {} {} ({}) {}",
                    "✓".green(),
                    task.name().bold(),
                    format_duration(report.duration),
                    format!("[{} written]", plural(report.changed.len(), "file")).dimmed()
                ));
            }

            if self.options.verbose {
                for path in &report.changed {
                    spinner.println(format!("      {}", path.display().to_string().dimmed()));
                }
            }
        }

        result.reports.push(report);
        Ok(())
    }

    /// Print the execution plan
    fn print_execution_plan(&self, ctx: &BuildContext, composition: &Composition, dag: &DagBuilder) {
        let order = dag.topological_order();

        println!();
        println!(
            "{}: {} {}",
            "Composition".bold(),
            composition.name,
            format!("({})", ctx.mode()).dimmed()
        );
        println!("{}", "═".repeat(50));
        println!(
            "Execution plan ({}{}):",
            plural(order.len(), "task"),
            if composition.concurrent { ", concurrent" } else { "" }
        );
        println!();

        for (i, task) in order.into_iter().enumerate() {
            print!("  {}. {} ({})", i + 1, task.name().bold(), task.description());

            let deps = dag.dependencies(task);
            if !deps.is_empty() {
                let names: Vec<&str> = deps.iter().map(|d| d.name()).collect();
                print!(" {}", format!("[depends: {}]", names.join(", ")).dimmed());
            }

            println!();
        }

        println!();
    }

    fn print_summary(&self, composition: &Composition, result: &CompositionResult) {
        println!();
        let elapsed = format_duration(result.duration);

        if result.success() {
            println!(
                "{}",
                format!("{} completed successfully in {}", composition.name, elapsed).green()
            );
        } else {
            println!(
                "{}",
                format!(
                    "{} finished in {} with {} failed",
                    composition.name,
                    elapsed,
                    plural(result.failures.len(), "task")
                )
                .yellow()
            );
        }
    }
}
