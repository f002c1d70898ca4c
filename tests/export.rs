// tests/export.rs

use std::fs;

use dagsynth::config::model::DagFormats;
use dagsynth::export::{COMBINATION_LOG_FILE, DagExporter, to_dot, to_json_string, to_node_link};
use dagsynth::generate::Generator;
use dagsynth::types::Number;
use dagsynth_test_utils::builders::{GNP_TOML, config_from_toml};
use dagsynth_test_utils::{init_tracing, path_dag};
use tempfile::tempdir;

fn annotated_path() -> dagsynth::dag::TaskDag {
    let mut dag = path_dag(3);
    for n in dag.nodes() {
        dag.node_mut(n).execution_time = Some(n as u64 + 1);
    }
    dag.node_mut(0).period = Some(10);
    dag.node_mut(0).offset = Some(2);
    dag.node_mut(0).utilization = Some(0.1);
    dag.node_mut(2).end_to_end_deadline = Some(9);
    dag.node_mut(1)
        .extras
        .insert("memory".to_string(), Number::Int(64));
    dag.edge_mut(0, 1).unwrap().communication_time = Some(4);
    dag
}

#[test]
fn node_link_json_has_networkx_layout() {
    let json = to_node_link(&annotated_path());

    assert_eq!(json["directed"], true);
    assert_eq!(json["multigraph"], false);
    assert!(json["graph"].as_object().unwrap().is_empty());

    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["id"], 0);
    assert_eq!(nodes[0]["execution_time"], 1);
    assert_eq!(nodes[0]["period"], 10);
    assert_eq!(nodes[0]["offset"], 2);
    assert_eq!(nodes[1]["memory"], 64);
    assert_eq!(nodes[2]["end_to_end_deadline"], 9);
    assert!(nodes[1].get("period").is_none());

    let links = json["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["source"], 0);
    assert_eq!(links[0]["target"], 1);
    assert_eq!(links[0]["communication_time"], 4);
    assert!(links[1].get("communication_time").is_none());
}

#[test]
fn utilization_is_never_exported() {
    let text = to_json_string(&annotated_path()).unwrap();
    assert!(!text.contains("utilization"));
}

#[test]
fn dot_marks_periodic_and_deadline_nodes() {
    let dot = to_dot(&annotated_path());

    assert!(dot.starts_with("digraph {"));
    assert!(dot.contains("label=\"[0]\\nC: 1\\nT: 10\" shape=box"));
    assert!(dot.contains("label=\"[2]\\nC: 3\\nD: 9\" style=bold"));
    assert!(dot.contains("0 -> 1 [ "));
    assert!(dot.contains("label=\" 4\" fontsize=10"));
}

#[test]
fn exporter_writes_one_directory_per_combination() {
    init_tracing();

    let dir = tempdir().unwrap();
    let cfg = config_from_toml(GNP_TOML);
    let generator = Generator::new(&cfg).unwrap();
    let mut exporter = DagExporter::new(dir.path(), cfg.output_formats().dag);

    let summary = generator.run(&mut exporter).unwrap();
    assert_eq!(summary.combinations.len(), 2);
    assert_eq!(summary.generated(), 6);
    assert_eq!(summary.failed(), 0);

    for combo_dir in ["PE_0.2", "PE_0.4"] {
        let path = dir.path().join(combo_dir);
        let log = fs::read_to_string(path.join(COMBINATION_LOG_FILE)).unwrap();
        assert!(log.contains("seed = 7"), "{log}");
        assert!(log.contains(&format!("directory = \"{combo_dir}\"")), "{log}");

        for i in 0..3 {
            assert!(path.join(format!("dag_{i}.json")).is_file());
            assert!(path.join(format!("dag_{i}.dot")).is_file());
        }
        assert!(!path.join("dag_3.json").exists());
    }
}

#[test]
fn exporter_respects_disabled_formats() {
    let dir = tempdir().unwrap();
    let exporter = DagExporter::new(
        dir.path(),
        DagFormats {
            json: false,
            dot: true,
        },
    );

    exporter.export(&path_dag(2), dir.path(), "only_dot").unwrap();
    assert!(dir.path().join("only_dot.dot").is_file());
    assert!(!dir.path().join("only_dot.json").exists());
}

#[test]
fn exported_json_reads_back_as_the_same_graph() {
    let dag = annotated_path();
    let text = to_json_string(&dag).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    let edges: Vec<(u64, u64)> = value["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| (l["source"].as_u64().unwrap(), l["target"].as_u64().unwrap()))
        .collect();
    assert_eq!(edges, vec![(0, 1), (1, 2)]);
}
