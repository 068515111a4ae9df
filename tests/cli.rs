use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/pokemon_small.csv");

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("pokecsv").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pokecsv"))
        .stdout(predicate::str::contains("fetch"));
}

#[test]
fn unknown_endpoint_fails_before_any_request() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("pokecsv").unwrap();
    cmd.args(["fetch", "-e", "pokemon", "-e", "berry", "--base-url", "http://127.0.0.1:9"])
        .arg("--out-dir")
        .arg(tmp.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown endpoint 'berry'"));
    assert!(!tmp.path().join("pokeapi_pokemon.csv").exists());
}

#[test]
fn images_subcommand_writes_csv() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("pokemon_images.csv");
    let mut cmd = Command::cargo_bin("pokecsv").unwrap();
    cmd.args(["images", "--input", FIXTURE, "--output"]).arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Saved 14 image rows"));
    assert!(out.exists());
}

#[test]
fn viz_on_missing_input_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("pokecsv").unwrap();
    cmd.args(["viz", "--input"])
        .arg(tmp.path().join("nope.csv"))
        .arg("--out-dir")
        .arg(tmp.path());
    cmd.assert().failure();
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn fetch_online_stat() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("pokecsv").unwrap();
    cmd.args(["fetch", "-e", "stat", "--delay-ms", "50", "--out-dir"]).arg(tmp.path());
    cmd.assert().success();
    assert!(tmp.path().join("pokeapi_stat.csv").exists());
}
