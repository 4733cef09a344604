// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Task compositions
//!
//! A composition is a named set of tasks with explicit dependencies and a
//! failure policy.

use crate::tasks::TaskKind;

/// What happens when a task fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure and return it
    FailFast,
    /// Log the failure and let the other tasks finish
    Isolate,
}

/// One task and the tasks that must finish before it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNode {
    pub task: TaskKind,
    pub depends_on: Vec<TaskKind>,
}

impl TaskNode {
    pub fn new(task: TaskKind) -> Self {
        Self {
            task,
            depends_on: Vec::new(),
        }
    }

    pub fn after(mut self, task: TaskKind) -> Self {
        self.depends_on.push(task);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Composition {
    pub name: String,
    pub nodes: Vec<TaskNode>,
    pub policy: FailurePolicy,
    /// Run independent tasks concurrently
    pub concurrent: bool,
}

impl Composition {
    pub fn new(name: impl Into<String>, nodes: Vec<TaskNode>, policy: FailurePolicy) -> Self {
        Self {
            name: name.into(),
            nodes,
            policy,
            concurrent: false,
        }
    }

    /// Clean, then every writer in order
    pub fn build() -> Self {
        use TaskKind::*;

        let mut nodes = vec![TaskNode::new(Clean)];
        nodes.extend(
            [Markup, Stylesheet, Script, Image, Vendor]
                .into_iter()
                .map(|task| TaskNode::new(task).after(Clean)),
        );

        Self::new("build", nodes, FailurePolicy::FailFast)
    }

    /// Every writer at once, failures isolated, no clean
    pub fn serve() -> Self {
        use TaskKind::*;

        let nodes = [Markup, Stylesheet, Script, Vendor, Image]
            .into_iter()
            .map(TaskNode::new)
            .collect();

        Self::new("serve", nodes, FailurePolicy::Isolate).concurrent(true)
    }

    /// A lone task, as run from the command line
    pub fn single(task: TaskKind) -> Self {
        Self::new(task.name(), vec![TaskNode::new(task)], FailurePolicy::FailFast)
    }

    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn tasks(&self) -> impl Iterator<Item = TaskKind> + '_ {
        self.nodes.iter().map(|n| n.task)
    }

    pub fn node(&self, task: TaskKind) -> Option<&TaskNode> {
        self.nodes.iter().find(|n| n.task == task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_writers_follow_clean() {
        let build = Composition::build();

        assert_eq!(build.nodes[0], TaskNode::new(TaskKind::Clean));
        for node in &build.nodes[1..] {
            assert_eq!(node.depends_on, vec![TaskKind::Clean]);
        }
        assert_eq!(build.policy, FailurePolicy::FailFast);
        assert!(!build.concurrent);
    }

    #[test]
    fn test_serve_has_no_clean_or_edges() {
        let serve = Composition::serve();

        assert!(serve.node(TaskKind::Clean).is_none());
        assert!(serve.nodes.iter().all(|n| n.depends_on.is_empty()));
        assert_eq!(serve.tasks().count(), 5);
        assert_eq!(serve.policy, FailurePolicy::Isolate);
        assert!(serve.concurrent);
    }
}
