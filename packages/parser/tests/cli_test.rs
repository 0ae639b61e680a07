//! Command-line tests for the leyes-parser binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn parse_writes_wrapped_json() {
    let out = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("leyes-parser");
    cmd.arg("parse")
        .arg(fixture_path("clean_ley_de_aguas.txt"))
        .arg("-o")
        .arg(out.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Articles: 4").and(predicate::str::contains("Saved to:")));

    let written = fs::read_to_string(out.path().join("ley_de_aguas.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["ley_de_aguas.json"]["Año_publicación"], 2004);
    assert_eq!(value["ley_de_aguas.json"]["Capítulos"].as_array().unwrap().len(), 2);
}

#[test]
fn parse_to_stdout_as_yaml() {
    let mut cmd = cargo_bin_cmd!("leyes-parser");
    cmd.arg("parse")
        .arg(fixture_path("clean_ley_de_aguas.txt"))
        .args(["--stdout", "--format", "yaml", "--no-year"]);

    cmd.assert().success().stdout(
        predicate::str::starts_with("---\n")
            .and(predicate::str::contains("ley_de_aguas.json:"))
            .and(predicate::str::contains("Año_publicación: null")),
    );
}

#[test]
fn parse_rejects_document_without_articles() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("clean_aviso.txt");
    fs::write(&input, "Aviso sin artículos.\n").unwrap();

    let mut cmd = cargo_bin_cmd!("leyes-parser");
    cmd.arg("parse").arg(&input).arg("-o").arg(dir.path().join("out"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no permanent articles"));
    assert!(!dir.path().join("out").join("aviso.json").exists());
}

#[test]
fn parse_missing_file_fails() {
    let mut cmd = cargo_bin_cmd!("leyes-parser");
    cmd.arg("parse").arg("no_existe.txt");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Input file does not exist"));
}

#[test]
fn batch_reports_failures_and_exits_non_zero() {
    let dir = tempdir().unwrap();
    fs::copy(
        fixture_path("clean_ley_de_aguas.txt"),
        dir.path().join("clean_ley_de_aguas.txt"),
    )
    .unwrap();
    fs::write(dir.path().join("clean_vacia.txt"), "\n\n").unwrap();
    fs::write(dir.path().join("notas.txt"), "ignorado").unwrap();
    let out = dir.path().join("out");

    let mut cmd = cargo_bin_cmd!("leyes-parser");
    cmd.arg("batch").arg(dir.path()).arg("-o").arg(&out);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("1 processed, 1 failed"))
        .stderr(predicate::str::contains("1 of 2 documents failed"));
    assert!(out.join("ley_de_aguas.json").exists());
}

#[test]
fn batch_succeeds_when_all_documents_parse() {
    let dir = tempdir().unwrap();
    fs::copy(
        fixture_path("clean_ley_de_aguas.txt"),
        dir.path().join("limpio_aguas.txt"),
    )
    .unwrap();
    let out = dir.path().join("out");

    let mut cmd = cargo_bin_cmd!("leyes-parser");
    cmd.arg("batch")
        .arg(dir.path())
        .args(["--prefix", "limpio_", "--format", "yaml", "-o"])
        .arg(&out);

    cmd.assert().success();
    assert!(out.join("aguas.yaml").exists());
}

#[test]
fn extract_requires_api_key() {
    let mut cmd = cargo_bin_cmd!("leyes-parser");
    cmd.env_remove("LLM_API_KEY")
        .arg("extract")
        .arg(fixture_path("clean_ley_de_aguas.txt"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("LLM_API_KEY not set"));
}
