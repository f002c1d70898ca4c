// src/export/json.rs

//! Node-link JSON, the layout networkx reads with `node_link_graph`.

use serde_json::{Map, Value, json};

use crate::dag::{TaskDag, TaskEdge, TaskNode};
use crate::errors::Result;
use crate::types::Number;

/// Node-link document for `dag`.
///
/// `utilization` is internal to the generator and never exported.
pub fn to_node_link(dag: &TaskDag) -> Value {
    let nodes: Vec<Value> = dag
        .nodes()
        .map(|n| {
            let mut obj = node_fields(dag.node(n));
            obj.insert("id".to_string(), json!(n));
            Value::Object(obj)
        })
        .collect();

    let links: Vec<Value> = dag
        .edges()
        .into_iter()
        .filter_map(|(src, tgt)| {
            let edge = dag.edge(src, tgt)?;
            let mut obj = edge_fields(edge);
            obj.insert("source".to_string(), json!(src));
            obj.insert("target".to_string(), json!(tgt));
            Some(Value::Object(obj))
        })
        .collect();

    json!({
        "directed": true,
        "multigraph": false,
        "graph": {},
        "nodes": nodes,
        "links": links,
    })
}

/// Pretty-printed node-link JSON.
pub fn to_json_string(dag: &TaskDag) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_node_link(dag))?)
}

fn node_fields(node: &TaskNode) -> Map<String, Value> {
    let mut obj = Map::new();
    let fields = [
        ("execution_time", node.execution_time),
        ("period", node.period),
        ("end_to_end_deadline", node.end_to_end_deadline),
        ("offset", node.offset),
    ];
    for (key, value) in fields {
        if let Some(v) = value {
            obj.insert(key.to_string(), json!(v));
        }
    }
    insert_extras(&mut obj, &node.extras);
    obj
}

fn edge_fields(edge: &TaskEdge) -> Map<String, Value> {
    let mut obj = Map::new();
    if let Some(c) = edge.communication_time {
        obj.insert("communication_time".to_string(), json!(c));
    }
    insert_extras(&mut obj, &edge.extras);
    obj
}

fn insert_extras<'a>(obj: &mut Map<String, Value>, extras: impl IntoIterator<Item = (&'a String, &'a Number)>) {
    for (name, value) in extras {
        obj.insert(name.clone(), json!(value));
    }
}
