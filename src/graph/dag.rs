// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! DAG (Directed Acyclic Graph) builder for task dependencies
//!
//! Validates a composition before anything runs and groups its tasks into
//! levels: every task in a level depends only on tasks in earlier levels.

use petgraph::algo::{has_path_connecting, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

use super::Composition;
use crate::errors::{AssetflowError, AssetflowResult};
use crate::tasks::TaskKind;

/// Builder for task dependency DAGs
#[derive(Debug)]
pub struct DagBuilder {
    graph: DiGraph<TaskKind, ()>,
    index: HashMap<TaskKind, NodeIndex>,
}

impl DagBuilder {
    /// Build and validate the DAG of a composition
    pub fn build(composition: &Composition) -> AssetflowResult<Self> {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        // Node indices follow declaration order
        for task in composition.tasks() {
            index.entry(task).or_insert_with(|| graph.add_node(task));
        }

        for node in &composition.nodes {
            let to = index[&node.task];
            for dep in &node.depends_on {
                let from = index.get(dep).ok_or_else(|| AssetflowError::UnknownDependency {
                    task: node.task.to_string(),
                    dependency: dep.to_string(),
                })?;

                if !graph.contains_edge(*from, to) {
                    graph.add_edge(*from, to, ());
                }
            }
        }

        let dag = Self { graph, index };
        dag.validate_acyclic()?;
        Ok(dag)
    }

    fn validate_acyclic(&self) -> AssetflowResult<()> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(AssetflowError::CircularDependency {
                tasks: self.cycle_members(cycle.node_id()),
            }),
        }
    }

    /// Tasks in the strongly connected component containing `start`
    fn cycle_members(&self, start: NodeIndex) -> Vec<String> {
        let mut members: Vec<NodeIndex> = tarjan_scc(&self.graph)
            .into_iter()
            .find(|component| component.contains(&start))
            .unwrap_or_else(|| vec![start]);
        members.sort();

        members
            .into_iter()
            .map(|n| self.graph[n].to_string())
            .collect()
    }

    /// Tasks grouped by dependency depth, declaration order within a level
    pub fn levels(&self) -> Vec<Vec<TaskKind>> {
        let mut depth: HashMap<NodeIndex, usize> = HashMap::new();

        // Acyclic was checked in build(), so toposort cannot fail here
        let order = toposort(&self.graph, None).unwrap_or_default();
        for node in order {
            let level = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .filter_map(|dep| depth.get(&dep))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(node, level);
        }

        let mut levels: Vec<Vec<TaskKind>> = Vec::new();
        for node in self.graph.node_indices() {
            let level = depth.get(&node).copied().unwrap_or(0);
            if levels.len() <= level {
                levels.resize_with(level + 1, Vec::new);
            }
            levels[level].push(self.graph[node]);
        }

        levels
    }

    /// Flattened execution order
    pub fn topological_order(&self) -> Vec<TaskKind> {
        self.levels().into_iter().flatten().collect()
    }

    /// Tasks that must finish before `task`, in declaration order
    pub fn dependencies(&self, task: TaskKind) -> Vec<TaskKind> {
        self.neighbors(task, Direction::Incoming)
    }

    /// Tasks waiting on `task`
    pub fn dependents(&self, task: TaskKind) -> Vec<TaskKind> {
        self.neighbors(task, Direction::Outgoing)
    }

    fn neighbors(&self, task: TaskKind, direction: Direction) -> Vec<TaskKind> {
        let Some(node) = self.index.get(&task) else {
            return Vec::new();
        };

        let mut nodes: Vec<NodeIndex> = self.graph.neighbors_directed(*node, direction).collect();
        nodes.sort();
        nodes.into_iter().map(|n| self.graph[n]).collect()
    }

    /// Whether `a` depends, directly or transitively, on `b`
    pub fn depends_on(&self, a: TaskKind, b: TaskKind) -> bool {
        let (Some(a), Some(b)) = (self.index.get(&a), self.index.get(&b)) else {
            return false;
        };
        a != b && has_path_connecting(&self.graph, *b, *a, None)
    }

    /// Mermaid flowchart
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");

        for node in self.graph.node_indices() {
            let task = self.graph[node];
            out.push_str(&format!("    {}[{}]\n", task, task.command()));
        }

        for edge in self.graph.edge_references() {
            out.push_str(&format!(
                "    {} --> {}\n",
                self.graph[edge.source()],
                self.graph[edge.target()]
            ));
        }

        out
    }

    /// Graphviz DOT
    pub fn to_dot(&self, name: &str) -> String {
        let mut out = format!("digraph {} {{\n", name);
        out.push_str("    rankdir=TB;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for edge in self.graph.edge_references() {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                self.graph[edge.source()],
                self.graph[edge.target()]
            ));
        }

        for node in self.graph.node_indices() {
            if self.graph.neighbors_undirected(node).next().is_none() {
                out.push_str(&format!("    \"{}\";\n", self.graph[node]));
            }
        }

        out.push_str("}\n");
        out
    }

    /// Numbered execution order with dependencies
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        for (i, task) in self.topological_order().into_iter().enumerate() {
            out.push_str(&format!("{}. {} ({})", i + 1, task, task.description()));

            let deps = self.dependencies(task);
            if !deps.is_empty() {
                let names: Vec<&str> = deps.iter().map(|d| d.name()).collect();
                out.push_str(&format!(" [depends: {}]", names.join(", ")));
            }

            out.push('\n');
        }

        out
    }
}
