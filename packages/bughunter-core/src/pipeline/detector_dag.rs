//! Detector DAG - execution order of repair action detectors
//!
//! Every detector writes exactly one category and may read categories
//! written by earlier detectors. The dependency table lives on
//! [`ActionKind::dependencies`]; this module turns the enabled subset into
//! a petgraph DAG and validates it before anything runs:
//! - a prerequisite that is not enabled is `DependencyMissing`
//! - a cycle or a duplicate registration is a pipeline error

use crate::errors::{BughunterError, Result};
use crate::features::repair_actions::ActionKind;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

/// Validated dependency graph of the enabled detectors
///
/// Edge A → B means A must complete before B starts.
#[derive(Debug)]
pub struct DetectorDag {
    graph: DiGraph<ActionKind, ()>,

    /// Category → node index mapping for O(1) lookups
    kind_to_node: HashMap<ActionKind, NodeIndex>,

    /// Cached topological execution order
    execution_order: Vec<ActionKind>,
}

impl DetectorDag {
    /// Build and validate the DAG for the enabled categories
    pub fn build(enabled: &[ActionKind]) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut kind_to_node = HashMap::new();

        for &kind in enabled {
            if kind_to_node.contains_key(&kind) {
                return Err(BughunterError::pipeline(format!(
                    "detector {} is registered twice",
                    kind
                )));
            }
            let idx = graph.add_node(kind);
            kind_to_node.insert(kind, idx);
        }

        for &kind in enabled {
            let to_idx = kind_to_node[&kind];
            for &dep in kind.dependencies() {
                let Some(&from_idx) = kind_to_node.get(&dep) else {
                    return Err(BughunterError::DependencyMissing {
                        detector: kind,
                        missing: dep,
                    });
                };
                graph.add_edge(from_idx, to_idx, ());
            }
        }

        let execution_order = match toposort(&graph, None) {
            Ok(order) => order.into_iter().map(|idx| graph[idx]).collect(),
            Err(cycle) => {
                return Err(BughunterError::pipeline(format!(
                    "detector dependencies contain a cycle involving {}",
                    graph[cycle.node_id()]
                )));
            }
        };

        Ok(Self {
            graph,
            kind_to_node,
            execution_order,
        })
    }

    /// Execution order; every detector appears after all of its prerequisites
    pub fn execution_order(&self) -> &[ActionKind] {
        &self.execution_order
    }

    /// Direct prerequisites of a detector
    pub fn dependencies(&self, kind: ActionKind) -> Vec<ActionKind> {
        self.neighbors(kind, Direction::Incoming)
    }

    /// Detectors that directly read this detector's category
    pub fn dependents(&self, kind: ActionKind) -> Vec<ActionKind> {
        self.neighbors(kind, Direction::Outgoing)
    }

    fn neighbors(&self, kind: ActionKind, direction: Direction) -> Vec<ActionKind> {
        let Some(&idx) = self.kind_to_node.get(&kind) else {
            return Vec::new();
        };
        let mut kinds: Vec<_> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n])
            .collect();
        kinds.sort();
        kinds
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.kind_to_node.contains_key(&kind)
    }

    pub fn detector_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Smallest superset of `kinds` that is closed under dependencies, in
/// pipeline order
pub fn dependency_closure(kinds: &[ActionKind]) -> Vec<ActionKind> {
    let mut needed: Vec<ActionKind> = kinds.to_vec();
    let mut cursor = 0;
    while cursor < needed.len() {
        for dep in needed[cursor].dependencies() {
            if !needed.contains(dep) {
                needed.push(*dep);
            }
        }
        cursor += 1;
    }
    needed.sort();
    needed.dedup();
    needed
}
