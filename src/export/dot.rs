// src/export/dot.rs

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::dag::{TaskDag, TaskEdge, TaskNode};

/// Graphviz DOT text for `dag`.
///
/// Timer-driven nodes (with a period) are drawn as boxes, sinks with a
/// deadline in bold.
pub fn to_dot(dag: &TaskDag) -> String {
    let node_attrs = |_: &DiGraph<TaskNode, TaskEdge>, (idx, node): (NodeIndex, &TaskNode)| {
        let label = format!("[{}]\n{}", idx.index(), node).replace('\n', "\\n");
        let mut attrs = format!("label=\"{label}\"");
        if node.period.is_some() {
            attrs.push_str(" shape=box");
        }
        if node.end_to_end_deadline.is_some() {
            attrs.push_str(" style=bold");
        }
        attrs
    };
    let edge_attrs = |_: &DiGraph<TaskNode, TaskEdge>, edge: EdgeReference<'_, TaskEdge>| {
        match edge.weight().communication_time {
            Some(c) => format!("label=\" {c}\" fontsize=10"),
            None => String::new(),
        }
    };

    let dot = Dot::with_attr_getters(
        dag.graph(),
        &[Config::NodeNoLabel, Config::EdgeNoLabel],
        &edge_attrs,
        &node_attrs,
    );
    format!("{dot}")
}
