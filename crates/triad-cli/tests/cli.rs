//! Command-line behaviour of the `triad` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ANSWERS_JSON: &str = r#"{
    "answers": [
        { "question_id": "q1", "category": "worldview",
          "contribution_tags": [{ "dimension": "creativity", "weight": 5.0 }] },
        { "question_id": "q2", "category": "worldview",
          "contribution_tags": [{ "dimension": "receptivity", "weight": 2.0 }] },
        { "question_id": "q3", "category": "scenario-outer",
          "contribution_tags": [{ "tag": "leadership", "weight": 1.0 }] },
        { "question_id": "q4", "category": "scenario-inner",
          "contribution_tags": [{ "tag": "caution", "weight": 1.0 }] }
    ]
}"#;

fn triad() -> Command {
    let mut cmd = Command::cargo_bin("triad").unwrap();
    cmd.env_remove("TRIAD_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.display().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn dynamics_prints_blended_properties() {
    let value = json_stdout(triad().args(["dynamics", "1", "8", "-o", "json"]));
    assert_eq!(value["value"]["innovation"], 7.2);
    assert_eq!(value["provenance"], "canonical");
    assert_eq!(value["confidence"], 1.0);
}

#[test]
fn dynamics_table_output_names_the_archetype() {
    triad()
        .args(["dynamics", "1", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#8"))
        .stdout(predicate::str::contains("innovation"));
}

#[test]
fn invalid_trigram_without_context_fails() {
    triad()
        .args(["dynamics", "9", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid trigram id 9"));
}

#[test]
fn invalid_trigram_with_vector_is_estimated() {
    let value = json_stdout(triad().args([
        "dynamics",
        "9",
        "1",
        "--vector",
        "0,0,0,1,0,0,0,0",
        "-o",
        "json",
    ]));
    assert_eq!(value["provenance"], "estimated");
    assert!(value["confidence"].as_f64().unwrap() < 1.0);
}

#[test]
fn short_vector_is_rejected() {
    triad()
        .args(["dynamics", "9", "1", "--vector", "1,2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs 8 values"));
}

#[test]
fn compat_is_order_independent() {
    let ab = json_stdout(triad().args(["compat", "12", "40", "-o", "json"]));
    let ba = json_stdout(triad().args(["compat", "40", "12", "-o", "json"]));
    assert_eq!(ab, ba);
    assert_eq!(ab["a"], 12);
    assert_eq!(ab["b"], 40);
    assert_eq!(ab["provenance"], "heuristic");
}

#[test]
fn compat_rejects_unknown_ids() {
    triad()
        .args(["compat", "0", "65"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("(0, 65)"));
}

#[test]
fn archetypes_lists_all_sixty_four() {
    let value = json_stdout(triad().args(["archetypes", "-o", "json"]));
    let list = value.as_array().unwrap();
    assert_eq!(list.len(), 64);
    assert_eq!(list[0]["id"], 1);
    assert_eq!(list[63]["id"], 64);
}

#[test]
fn archetypes_filter_by_keyword() {
    let value = json_stdout(triad().args(["archetypes", "--keyword", "Caution", "-o", "json"]));
    let list = value.as_array().unwrap();
    // every archetype with Water as upper or lower trigram
    assert_eq!(list.len(), 15);
    assert!(list
        .iter()
        .all(|a| a["keywords"].as_array().unwrap().iter().any(|k| k == "caution")));
}

#[test]
fn analyze_answer_file_as_json() {
    let dir = TempDir::new().unwrap();
    let answers = write_file(&dir, "answers.json", ANSWERS_JSON);

    let profile = json_stdout(triad().args(["analyze", &answers, "-o", "json"]));
    assert_eq!(profile["engine"]["archetype"], 8);
    assert_eq!(profile["interface"]["archetype"], 1);
    assert_eq!(profile["safe_mode"]["archetype"], 6);
    assert_eq!(profile["low_confidence"], false);
    assert!(profile["metadata"]["profile_id"].is_string());
    assert!(profile["optimization_hints"]["immediate"].is_array());
    assert!(profile["recommendations"].is_array());
}

#[test]
fn analyze_flags_answers_without_scenario_matches() {
    let dir = TempDir::new().unwrap();
    let answers = write_file(
        &dir,
        "answers.json",
        r#"{ "answers": [
            { "question_id": "q1", "category": "worldview",
              "contribution_tags": [{ "dimension": "creativity", "weight": 3.0 }] },
            { "question_id": "q2", "category": "scenario-outer",
              "contribution_tags": [{ "tag": "zzz", "weight": 1.0 }] }
        ] }"#,
    );

    let profile = json_stdout(triad().args(["analyze", &answers, "-o", "json"]));
    assert_eq!(profile["interface"]["score"], 0.0);
    assert_eq!(profile["low_confidence"], true);

    triad()
        .args(["analyze", &answers])
        .assert()
        .success()
        .stdout(predicate::str::contains("rough sketch"));
}

#[test]
fn analyze_answer_file_as_table() {
    let dir = TempDir::new().unwrap();
    let answers = write_file(&dir, "answers.json", ANSWERS_JSON);

    triad()
        .args(["analyze", &answers])
        .assert()
        .success()
        .stdout(predicate::str::contains("Engine"))
        .stdout(predicate::str::contains("SafeMode"))
        .stdout(predicate::str::contains("Effectiveness"));
}

#[test]
fn analyze_as_yaml() {
    let dir = TempDir::new().unwrap();
    let answers = write_file(&dir, "answers.json", ANSWERS_JSON);

    triad()
        .args(["analyze", &answers, "-o", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("relation_type:"));
}

#[test]
fn analyze_missing_file_fails() {
    triad()
        .args(["analyze", "/nonexistent/answers.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn exported_matrix_round_trips_through_table_option() {
    let dir = TempDir::new().unwrap();
    let output = triad().args(["matrix", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    let table = dir.path().join("table.json");
    std::fs::write(&table, &output.stdout).unwrap();

    let heuristic = json_stdout(triad().args(["compat", "3", "9", "-o", "json"]));
    let precomputed = json_stdout(triad().args([
        "compat",
        "3",
        "9",
        "-o",
        "json",
        "--table",
        table.to_str().unwrap(),
    ]));
    assert_eq!(precomputed["provenance"], "precomputed");
    assert_eq!(precomputed["confidence"], 1.0);
    assert_eq!(precomputed["relation_type"], heuristic["relation_type"]);
}

#[test]
fn config_from_environment_disables_heuristic() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "triad.toml", "[fallback]\nheuristic_enabled = false\n");

    triad()
        .env("TRIAD_CONFIG", &config)
        .args(["compat", "3", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no compatibility data"));
}

#[test]
fn invalid_config_fails_before_running() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "triad.toml", "[exemplars]\nmin_similarity = 3.0\n");

    triad()
        .args(["archetypes", "--config", &config])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}
