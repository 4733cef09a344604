// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Task graphs: compositions, their DAG, and the executor that runs them

mod composition;
mod dag;
mod executor;

pub use composition::{Composition, FailurePolicy, TaskNode};
pub use dag::DagBuilder;
pub use executor::{CompositionResult, ExecutionOptions, TaskExecutor};
