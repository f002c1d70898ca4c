// src/dag/mod.rs

//! Task graph representation and structural primitives.
//!
//! - [`graph`] holds [`TaskDag`], the petgraph-backed DAG with task and
//!   precedence attributes, and the [`Chain`] metadata of chain-based DAGs.
//! - [`ops`] contains the degree-aware helpers the builders share:
//!   minimum-edge layer connection, weak-connectivity repair and forced
//!   source/sink creation.

pub mod graph;
pub mod ops;

pub use graph::{Chain, TaskDag, TaskEdge, TaskNode};
pub use ops::{
    DegreeLimits, connect_minimum, ensure_weakly_connected, ensure_weakly_connected_within,
    force_create_sink_nodes, force_create_source_nodes, min_in_node, min_out_node,
};
