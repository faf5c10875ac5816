//! Command-line tests for the `leychile-epub` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn cmd() -> Command {
    cargo_bin_cmd!("leychile-epub")
}

#[test]
fn test_convert_writes_publication() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .arg("convert")
        .arg(fixture_path("ley_18700.xml"))
        .arg("--output")
        .arg(dir.path())
        .args(["--date", "2024-03-15"])
        .args([
            "--url",
            "https://www.bcn.cl/leychile/navegar?idNorma=30082&idVersion=2024-02-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to:"));

    let target = dir.path().join("Ley_18700");
    assert!(target.join("titulo_1.xhtml").is_file());

    let cover = fs::read_to_string(target.join("cover.xhtml")).unwrap();
    assert!(cover.contains("2024-02-01"));
}

#[test]
fn test_convert_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .arg("convert")
        .arg(dir.path().join("no_existe.xml"))
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: IO error"));
}

#[test]
fn test_convert_rejects_missing_output_dir() {
    cmd()
        .arg("convert")
        .arg(fixture_path("ley_18700.xml"))
        .args(["--output", "/definitely/not/here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an existing directory"));
}

#[test]
fn test_batch_counts_failures() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("leyes.txt");
    fs::write(
        &list,
        format!(
            "# leyes de prueba\n{}\n\nno_existe.xml\n",
            fixture_path("ley_18700.xml").display()
        ),
    )
    .unwrap();

    cmd()
        .arg("batch")
        .arg(&list)
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 1 of 2"))
        .stdout(predicate::str::contains("Failed: 1"));

    assert!(dir.path().join("Ley_18700").join("manifest.yaml").is_file());
}

#[test]
fn test_batch_empty_list_fails() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("vacio.txt");
    fs::write(&list, "\n# nada\n").unwrap();

    cmd()
        .arg("batch")
        .arg(&list)
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input records"));
}

#[test]
fn test_batch_all_failed_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("leyes.txt");
    fs::write(&list, "no_existe.xml\ntampoco.yaml\n").unwrap();

    cmd()
        .arg("batch")
        .arg(&list)
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Converted 0 of 2"))
        .stderr(predicate::str::contains("All 2 batch records failed"));
}
