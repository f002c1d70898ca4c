// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;

use petgraph::Direction;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

use crate::types::Number;

/// Task attributes stored on each node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskNode {
    pub execution_time: Option<u64>,
    pub period: Option<u64>,
    /// Only used while deriving `execution_time`; never exported.
    pub utilization: Option<f64>,
    pub end_to_end_deadline: Option<u64>,
    pub offset: Option<u64>,
    /// User-declared extra numeric properties.
    pub extras: BTreeMap<String, Number>,
}

/// Precedence attributes stored on each edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskEdge {
    pub communication_time: Option<u64>,
    pub extras: BTreeMap<String, Number>,
}

impl fmt::Display for TaskNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.execution_time {
            Some(c) => write!(f, "C: {c}")?,
            None => write!(f, "C: -")?,
        }
        if let Some(t) = self.period {
            write!(f, "\nT: {t}")?;
        }
        if let Some(d) = self.end_to_end_deadline {
            write!(f, "\nD: {d}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TaskEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.communication_time {
            Some(c) => write!(f, "{c}"),
            None => Ok(()),
        }
    }
}

/// One chain of a chain-based DAG: a main sequence plus sub-sequences
/// branching off it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// Unique source of the chain (first node of the main sequence).
    pub head: usize,
    /// Last node of the main sequence.
    pub main_tail: usize,
    /// Last node of every sub-sequence.
    pub sub_sequence_tails: Vec<usize>,
    /// Every node of the chain, in creation order.
    pub nodes: Vec<usize>,
    /// Edges internal to the chain.
    pub edges: Vec<(usize, usize)>,
}

impl Chain {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Main tail followed by sub-sequence tails.
    pub fn tails(&self) -> Vec<usize> {
        let mut tails = vec![self.main_tail];
        tails.extend(self.sub_sequence_tails.iter().copied());
        tails
    }
}

/// Directed acyclic task graph.
///
/// Node ids are the contiguous integers `0..N-1`; they are equal to the
/// petgraph node indices because nodes are only ever appended. Sources and
/// sinks are recomputed from the topology on every query.
#[derive(Debug, Clone, Default)]
pub struct TaskDag {
    graph: DiGraph<TaskNode, TaskEdge>,
    chains: Vec<Chain>,
}

impl TaskDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// DAG with `n` isolated nodes `0..n-1`.
    pub fn with_nodes(n: usize) -> Self {
        let mut dag = Self::new();
        for _ in 0..n {
            dag.add_node();
        }
        dag
    }

    /// Append a fresh node and return its id.
    pub fn add_node(&mut self) -> usize {
        self.graph.add_node(TaskNode::default()).index()
    }

    /// Add the edge `src -> tgt` unless it already exists.
    ///
    /// Callers are responsible for keeping the graph acyclic; builders only
    /// add edges that respect a topological order.
    pub fn add_edge(&mut self, src: usize, tgt: usize) {
        let (a, b) = (NodeIndex::new(src), NodeIndex::new(tgt));
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, TaskEdge::default());
        }
    }

    pub fn has_edge(&self, src: usize, tgt: usize) -> bool {
        self.graph
            .find_edge(NodeIndex::new(src), NodeIndex::new(tgt))
            .is_some()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> std::ops::Range<usize> {
        0..self.graph.node_count()
    }

    /// All edges as `(src, tgt)` in insertion order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect()
    }

    pub fn in_degree(&self, node: usize) -> usize {
        self.graph
            .neighbors_directed(NodeIndex::new(node), Direction::Incoming)
            .count()
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.graph
            .neighbors_directed(NodeIndex::new(node), Direction::Outgoing)
            .count()
    }

    /// Direct predecessors of `node`, ascending.
    pub fn predecessors(&self, node: usize) -> Vec<usize> {
        self.sorted_neighbors(node, Direction::Incoming)
    }

    /// Direct successors of `node`, ascending.
    pub fn successors(&self, node: usize) -> Vec<usize> {
        self.sorted_neighbors(node, Direction::Outgoing)
    }

    fn sorted_neighbors(&self, node: usize, dir: Direction) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(node), dir)
            .map(|n| n.index())
            .collect();
        out.sort_unstable();
        out
    }

    /// Nodes with in-degree 0, ascending.
    pub fn sources(&self) -> Vec<usize> {
        self.nodes().filter(|&n| self.in_degree(n) == 0).collect()
    }

    /// Nodes with out-degree 0, ascending.
    pub fn sinks(&self) -> Vec<usize> {
        self.nodes().filter(|&n| self.out_degree(n) == 0).collect()
    }

    /// Every node from which `node` is reachable (excluding `node` itself).
    pub fn ancestors(&self, node: usize) -> BTreeSet<usize> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([node]);
        while let Some(current) = queue.pop_front() {
            for pred in self
                .graph
                .neighbors_directed(NodeIndex::new(current), Direction::Incoming)
            {
                if seen.insert(pred.index()) {
                    queue.push_back(pred.index());
                }
            }
        }
        seen
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Nodes in a topological order, or `None` if the graph has a cycle.
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(|n| n.index()).collect())
    }

    /// Weakly connected components, each sorted ascending; components are
    /// ordered by their smallest node id.
    pub fn weakly_connected_components(&self) -> Vec<Vec<usize>> {
        let mut uf = UnionFind::<usize>::new(self.node_count());
        for (src, tgt) in self.edges() {
            uf.union(src, tgt);
        }

        let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut root_order: Vec<usize> = Vec::new();
        for node in self.nodes() {
            let root = uf.find(node);
            let members = by_root.entry(root).or_default();
            if members.is_empty() {
                root_order.push(root);
            }
            members.push(node);
        }

        root_order
            .into_iter()
            .filter_map(|root| by_root.remove(&root))
            .collect()
    }

    pub fn node(&self, node: usize) -> &TaskNode {
        &self.graph[NodeIndex::new(node)]
    }

    pub fn node_mut(&mut self, node: usize) -> &mut TaskNode {
        &mut self.graph[NodeIndex::new(node)]
    }

    pub fn edge(&self, src: usize, tgt: usize) -> Option<&TaskEdge> {
        self.edge_index(src, tgt).map(|e| &self.graph[e])
    }

    pub fn edge_mut(&mut self, src: usize, tgt: usize) -> Option<&mut TaskEdge> {
        let idx = self.edge_index(src, tgt)?;
        Some(&mut self.graph[idx])
    }

    fn edge_index(&self, src: usize, tgt: usize) -> Option<EdgeIndex> {
        self.graph
            .find_edge(NodeIndex::new(src), NodeIndex::new(tgt))
    }

    /// Apply `f` to every edge weight, in insertion order.
    pub fn for_each_edge_mut(&mut self, mut f: impl FnMut(usize, usize, &mut TaskEdge)) {
        let ids: Vec<(EdgeIndex, usize, usize)> = self
            .graph
            .edge_references()
            .map(|e| (e.id(), e.source().index(), e.target().index()))
            .collect();
        for (id, src, tgt) in ids {
            f(src, tgt, &mut self.graph[id]);
        }
    }

    /// Chains recorded by the chain-based builder (empty otherwise).
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn set_chains(&mut self, chains: Vec<Chain>) {
        self.chains = chains;
    }

    /// Number of nodes on the longest path (by node count) in the DAG.
    pub fn longest_path_nodes(&self) -> usize {
        let Some(order) = self.topological_order() else {
            return 0;
        };
        let mut depth: HashMap<usize, usize> = HashMap::new();
        let mut best = 0;
        for node in order {
            let d = self
                .predecessors(node)
                .iter()
                .filter_map(|p| depth.get(p))
                .max()
                .map_or(1, |d| d + 1);
            depth.insert(node, d);
            best = best.max(d);
        }
        best
    }

    /// Underlying petgraph graph, for exporters.
    pub fn graph(&self) -> &DiGraph<TaskNode, TaskEdge> {
        &self.graph
    }
}
