//! CLI integration tests for formship
//!
//! These tests verify the complete workflow from initialization through
//! planning, validation and manifest output, ensuring commands work
//! together correctly.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the formship binary
fn formship_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("formship"))
}

/// Create a temporary directory and initialize a formship project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    formship_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Write a form definition into the project's forms directory
fn write_form(dir: &Path, id: &str, content: &str) {
    fs::write(dir.join("forms").join(format!("{}.json", id)), content).unwrap();
}

/// A form that embeds the given sub-forms
fn form_referencing(targets: &[&str]) -> String {
    let children: Vec<String> = targets
        .iter()
        .map(|t| format!(r#"{{"type": "subform", "formId": "{}"}}"#, t))
        .collect();
    format!(
        r#"{{"type": "form", "children": [{}]}}"#,
        children.join(", ")
    )
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    formship_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized formship project"));

    assert!(dir.path().join(".formship").is_dir());
    assert!(dir.path().join(".formship/config.toml").is_file());
    assert!(dir.path().join("forms").is_dir());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    formship_cmd().arg("init").arg(dir.path()).assert().success();
    formship_cmd().arg("init").arg(dir.path()).assert().success();
}

// =============================================================================
// Plan Tests
// =============================================================================

#[test]
fn test_plan_orders_dependencies_first() {
    let dir = setup_project();
    write_form(dir.path(), "parent", &form_referencing(&["child"]));
    write_form(dir.path(), "child", &form_referencing(&[]));

    formship_cmd()
        .current_dir(dir.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. child"))
        .stdout(predicate::str::contains("2. parent (after: child)"));
}

#[test]
fn test_plan_json_output() {
    let dir = setup_project();
    write_form(dir.path(), "parent", &form_referencing(&["child"]));
    write_form(dir.path(), "child", &form_referencing(&[]));

    let output = formship_cmd()
        .current_dir(dir.path())
        .args(["plan", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["analysis"]["deployment_order"][0], "child");
    assert_eq!(json["analysis"]["deployment_order"][1], "parent");
    assert!(json["target"].is_null());
}

#[test]
fn test_plan_reports_unverified_externals() {
    let dir = setup_project();
    write_form(dir.path(), "main", &form_referencing(&["lookup"]));

    formship_cmd()
        .current_dir(dir.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("External dependencies (1):"))
        .stdout(predicate::str::contains("unverified"));
}

#[test]
fn test_plan_loads_yaml_forms() {
    let dir = setup_project();
    fs::write(
        dir.path().join("forms/review.yaml"),
        "type: form\nchildren:\n  - type: subform\n    formId: intake\n",
    )
    .unwrap();
    write_form(dir.path(), "intake", &form_referencing(&[]));

    formship_cmd()
        .current_dir(dir.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. intake"))
        .stdout(predicate::str::contains("2. review"));
}

#[test]
fn test_plan_with_target_flags_missing_forms() {
    let dir = setup_project();
    write_form(dir.path(), "main", &form_referencing(&["present", "absent"]));

    fs::create_dir_all(dir.path().join("envs")).unwrap();
    fs::write(dir.path().join("envs/staging.json"), r#"["present"]"#).unwrap();
    fs::write(
        dir.path().join(".formship/config.toml"),
        "[targets.staging]\nmanifest = \"envs/staging.json\"\n",
    )
    .unwrap();

    formship_cmd()
        .current_dir(dir.path())
        .args(["plan", "--target", "staging"])
        .assert()
        .success()
        .stdout(predicate::str::contains("present: present"))
        .stdout(predicate::str::contains("MISSING: absent"));
}

#[test]
fn test_plan_fails_on_malformed_form() {
    let dir = setup_project();
    fs::write(dir.path().join("forms/broken.json"), "{not json").unwrap();

    formship_cmd()
        .current_dir(dir.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.json"));
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_passes_for_acyclic_bundle() {
    let dir = setup_project();
    write_form(dir.path(), "parent", &form_referencing(&["child"]));
    write_form(dir.path(), "child", &form_referencing(&[]));

    formship_cmd()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("ready to deploy"));
}

#[test]
fn test_check_fails_on_cycle() {
    let dir = setup_project();
    write_form(dir.path(), "form_a", &form_referencing(&["form_b"]));
    write_form(dir.path(), "form_b", &form_referencing(&["form_a"]));

    formship_cmd()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Circular dependency: form_a -> form_b -> form_a",
        ))
        .stderr(predicate::str::contains("Pre-flight check failed"));
}

#[test]
fn test_check_without_target_allows_externals() {
    let dir = setup_project();
    write_form(dir.path(), "main", &form_referencing(&["unverified"]));

    formship_cmd()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success();
}

#[test]
fn test_check_with_target_fails_on_missing_external() {
    let dir = setup_project();
    write_form(dir.path(), "main", &form_referencing(&["absent"]));

    fs::create_dir_all(dir.path().join("envs")).unwrap();
    fs::write(dir.path().join("envs/prod.json"), r#"[]"#).unwrap();
    fs::write(
        dir.path().join(".formship/config.toml"),
        "[targets.prod]\nmanifest = \"envs/prod.json\"\n",
    )
    .unwrap();

    formship_cmd()
        .current_dir(dir.path())
        .args(["check", "--target", "prod"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Missing from target: absent"));
}

#[test]
fn test_check_with_target_passes_when_externals_exist() {
    let dir = setup_project();
    write_form(dir.path(), "main", &form_referencing(&["departments"]));

    fs::create_dir_all(dir.path().join("envs")).unwrap();
    fs::write(dir.path().join("envs/prod.json"), r#"["departments"]"#).unwrap();
    fs::write(
        dir.path().join(".formship/config.toml"),
        "[targets.prod]\nmanifest = \"envs/prod.json\"\n",
    )
    .unwrap();

    formship_cmd()
        .current_dir(dir.path())
        .args(["check", "--target", "prod"])
        .assert()
        .success();
}

#[test]
fn test_check_json_reports_cycles() {
    let dir = setup_project();
    write_form(dir.path(), "form_a", &form_referencing(&["form_b"]));
    write_form(dir.path(), "form_b", &form_referencing(&["form_a"]));

    let output = formship_cmd()
        .current_dir(dir.path())
        .args(["check", "--format", "json"])
        .assert()
        .failure();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["circular_dependencies"][0][0], "form_a");
}

// =============================================================================
// Refs Tests
// =============================================================================

#[test]
fn test_refs_lists_references() {
    let dir = setup_project();
    write_form(dir.path(), "main", &form_referencing(&["child", "lookup"]));
    write_form(dir.path(), "child", &form_referencing(&[]));

    formship_cmd()
        .current_dir(dir.path())
        .args(["refs", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("child (in bundle)"))
        .stdout(predicate::str::contains("lookup (external)"));
}

#[test]
fn test_refs_unknown_form_fails() {
    let dir = setup_project();

    formship_cmd()
        .current_dir(dir.path())
        .args(["refs", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

// =============================================================================
// Graph Tests
// =============================================================================

#[test]
fn test_graph_emits_dot() {
    let dir = setup_project();
    write_form(dir.path(), "parent", &form_referencing(&["child"]));
    write_form(dir.path(), "child", &form_referencing(&[]));

    formship_cmd()
        .current_dir(dir.path())
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph"))
        .stdout(predicate::str::contains("parent"));
}

#[test]
fn test_graph_writes_file() {
    let dir = setup_project();
    write_form(dir.path(), "solo", &form_referencing(&[]));

    let out = dir.path().join("deps.dot");
    formship_cmd()
        .current_dir(dir.path())
        .args(["graph", "--output"])
        .arg(&out)
        .assert()
        .success();

    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.contains("solo"));
}

// =============================================================================
// Manifest Tests
// =============================================================================

#[test]
fn test_manifest_written_in_order() {
    let dir = setup_project();
    write_form(dir.path(), "parent", &form_referencing(&["child"]));
    write_form(dir.path(), "child", &form_referencing(&[]));

    formship_cmd()
        .current_dir(dir.path())
        .arg("manifest")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy-manifest.json"));

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join(".formship/deploy-manifest.json")).unwrap(),
    )
    .unwrap();

    assert_eq!(manifest["forms"][0]["id"], "child");
    assert_eq!(manifest["forms"][1]["id"], "parent");
    assert!(manifest["forms"][0]["digest"].as_str().unwrap().len() == 64);
}

#[test]
fn test_manifest_refuses_cycles() {
    let dir = setup_project();
    write_form(dir.path(), "form_a", &form_referencing(&["form_b"]));
    write_form(dir.path(), "form_b", &form_referencing(&["form_a"]));

    formship_cmd()
        .current_dir(dir.path())
        .arg("manifest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular"));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_plan_output_is_stable() {
    let dir = setup_project();
    write_form(dir.path(), "top", &form_referencing(&["left", "right"]));
    write_form(dir.path(), "left", &form_referencing(&["base"]));
    write_form(dir.path(), "right", &form_referencing(&["base"]));
    write_form(dir.path(), "base", &form_referencing(&[]));

    let first = formship_cmd()
        .current_dir(dir.path())
        .arg("plan")
        .assert()
        .success();
    let second = formship_cmd()
        .current_dir(dir.path())
        .arg("plan")
        .assert()
        .success();

    assert_eq!(first.get_output().stdout, second.get_output().stdout);

    let stdout = String::from_utf8_lossy(&first.get_output().stdout);
    let base_pos = stdout.find("1. base").unwrap();
    let left_pos = stdout.find("2. left").unwrap();
    assert!(base_pos < left_pos);
}
