use assert_cmd::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::process::Command;

const A: &str = "00000000-0000-0000-0000-000000000001";
const B: &str = "00000000-0000-0000-0000-000000000002";
const C: &str = "00000000-0000-0000-0000-000000000003";

fn exec_node(key: &str, x: f64, y: f64) -> Value {
    json!({
        "key": key,
        "position": { "x": x, "y": y },
        "size": { "width": 120.0, "height": 60.0 },
        "pins": [
            { "name": "execute", "direction": "input", "exec": true },
            { "name": "then", "direction": "output", "exec": true }
        ]
    })
}

/// A -> B plus an unconnected C.
fn document(read_only: bool) -> Value {
    json!({
        "schema": "weft/exec-data@1",
        "graph_id": "EventGraph",
        "read_only": read_only,
        "nodes": [exec_node(A, 10.0, 20.0), exec_node(B, 0.0, 0.0), exec_node(C, -50.0, 70.0)],
        "links": [
            { "from": { "node": A, "pin": "then" }, "to": { "node": B, "pin": "execute" } }
        ]
    })
}

fn write_doc(dir: &Path, doc: &Value) -> String {
    let path = dir.join("graph.json");
    fs::write(&path, serde_json::to_string(doc).expect("json")).expect("write doc");
    path.to_string_lossy().into_owned()
}

fn stdout_json(args: &[&str]) -> Value {
    let exe = assert_cmd::cargo_bin!("weft-cli");
    let out = Command::new(exe).args(args).assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).expect("stdout is JSON")
}

#[test]
fn cli_lays_out_every_node_by_default() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_doc(tmp.path(), &document(false));

    let report = stdout_json(&["layout", &input]);
    assert_eq!(report["nodes_laid_out"], json!(3));
    assert_eq!(report["components_laid_out"], json!(2));
    assert_eq!(report["positions"][A], json!({ "x": 10, "y": 20 }));
    assert_eq!(report["positions"][B], json!({ "x": 430, "y": 20 }));
    assert_eq!(report["positions"][C], json!({ "x": -50, "y": 70 }));
}

#[test]
fn cli_layout_respects_selection_and_overrides() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_doc(tmp.path(), &document(false));
    let config = tmp.path().join("settings.json");
    fs::write(&config, r#"{ "exec_spacing_x": 100.0 }"#).expect("write config");

    let report = stdout_json(&[
        "--config",
        config.to_string_lossy().as_ref(),
        "--placement",
        "simple",
        "--align",
        "left",
        "--select",
        B,
        &input,
    ]);
    assert_eq!(report["nodes_laid_out"], json!(2));
    assert_eq!(report["components_laid_out"], json!(1));
    assert_eq!(report["positions"][B], json!({ "x": 230, "y": 20 }));
    assert!(report["positions"].get(C).is_none());
}

#[test]
fn cli_reads_stdin() {
    let exe = assert_cmd::cargo_bin!("weft-cli");
    let out = assert_cmd::Command::new(exe)
        .args(["components", "-"])
        .write_stdin(serde_json::to_string(&document(false)).expect("json"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let components: Value = serde_json::from_slice(&out).expect("stdout is JSON");
    assert_eq!(components, json!([[A, B], [C]]));
}

#[test]
fn cli_reports_complexity() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_doc(tmp.path(), &document(false));
    let report = stdout_json(&["complexity", "--select", C, &input]);
    assert_eq!(report, json!({ "graph": 1, "selection": 1 }));
}

#[test]
fn cli_host_errors_exit_1_with_guidance() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_doc(tmp.path(), &document(true));

    let exe = assert_cmd::cargo_bin!("weft-cli");
    let out = Command::new(exe).args([input.as_str()]).assert().code(1).get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&out);
    assert!(stderr.contains("graph is read-only"), "{stderr}");
    assert!(stderr.contains("Choose a writable graph and retry."), "{stderr}");
}

#[test]
fn cli_usage_errors_exit_2() {
    let exe = assert_cmd::cargo_bin!("weft-cli");
    Command::new(exe).args(["--placement", "diagonal"]).assert().code(2);

    let exe = assert_cmd::cargo_bin!("weft-cli");
    Command::new(exe).args(["--select", "not-a-uuid"]).assert().code(2);

    let exe = assert_cmd::cargo_bin!("weft-cli");
    Command::new(exe).args(["--bogus"]).assert().code(2);
}
