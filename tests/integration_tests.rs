//! Integration tests for the resource-selector CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A small multi-module project
fn project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.json", br#"{"name": "app"}"#);
    write(root, "conf/app.yaml", b"server:\n  port: 8080\n");
    write(root, "conf/messages.properties", b"greeting=hello\n");
    write(root, "build/config.json", b"{}");
    write(root, "node_modules/pkg/package.json", b"{}");
    write(root, "sub/b.json", b"{}");
    write(root, "empty.json", b"");
    write(root, "README.md", b"# readme\n");
    temp_dir
}

fn selector() -> Command {
    let mut cmd = Command::cargo_bin("resource-selector").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let assert = cmd.assert().success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    selector()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("walks a project tree"));
}

#[test]
fn test_cli_short_help() {
    selector()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Find and parse resource files"));
}

#[test]
fn test_cli_version() {
    selector()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("resource-selector"));
}

#[test]
fn test_invalid_subcommand() {
    selector()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_list_skips_build_dirs_and_subprojects() {
    let project = project();

    selector()
        .arg("-C")
        .arg(project.path())
        .args(["list", "--subproject", "sub"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "a.json\nconf/app.yaml\nconf/messages.properties\n",
        ));
}

#[test]
fn test_list_json() {
    let project = project();

    let listed = json_stdout(
        selector()
            .arg("-C")
            .arg(project.path())
            .args(["list", "--format", "json", "--exclude", "**/*.properties"]),
    );
    assert_eq!(
        listed,
        serde_json::json!(["a.json", "sub/b.json", "conf/app.yaml"])
    );
}

#[test]
fn test_list_search_dir() {
    let project = project();

    selector()
        .arg("-C")
        .arg(project.path())
        .args(["list", "conf"])
        .assert()
        .success()
        .stdout(predicate::str::diff("conf/app.yaml\nconf/messages.properties\n"));
}

#[test]
fn test_list_missing_search_dir() {
    let project = project();

    selector()
        .arg("-C")
        .arg(project.path())
        .args(["list", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Search directory not found"));
}

#[test]
fn test_size_threshold() {
    let temp_dir = TempDir::new().unwrap();
    let mut big = b"{\"pad\": \"".to_vec();
    big.resize(2 * 1024 * 1024, b'x');
    big.extend_from_slice(b"\"}");
    write(temp_dir.path(), "big.json", &big);
    write(temp_dir.path(), "small.json", b"{}");

    selector()
        .arg("-C")
        .arg(temp_dir.path())
        .args(["list", "--size-threshold", "1"])
        .assert()
        .success()
        .stdout(predicate::str::diff("small.json\n"));

    selector()
        .arg("-C")
        .arg(temp_dir.path())
        .args(["list", "--size-threshold", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::diff("big.json\nsmall.json\n"));
}

#[test]
fn test_invalid_exclusion_pattern_fails() {
    let project = project();

    selector()
        .arg("-C")
        .arg(project.path())
        .args(["list", "--exclude", "conf/[oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid exclusion pattern 'conf/[oops'"));
}

#[test]
fn test_parse_json_report() {
    let project = project();

    let report = json_stdout(
        selector()
            .arg("-C")
            .arg(project.path())
            .args(["parse", "--format", "json", "--subproject", "sub"]),
    );

    let documents = report["documents"].as_array().unwrap();
    let sources: Vec<&str> = documents
        .iter()
        .map(|doc| doc["source_path"].as_str().unwrap())
        .collect();
    assert_eq!(sources, vec!["a.json", "conf/app.yaml", "conf/messages.properties"]);

    assert_eq!(documents[0]["format"], "json");
    assert_eq!(documents[0]["body"]["status"], "parsed");
    assert_eq!(documents[0]["body"]["value"]["name"], "app");
    assert_eq!(documents[1]["body"]["value"][0]["server"]["port"], 8080);
    assert_eq!(documents[2]["body"]["value"]["greeting"], "hello");

    // sub/b.json is claimed by the subproject exclusion
    assert_eq!(report["claimed"], 4);
    assert_eq!(report["issues"], serde_json::json!([]));
}

#[test]
fn test_parse_lenient_reports_malformed() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "good.json", b"{}");
    write(temp_dir.path(), "bad.json", b"{ not json");

    selector()
        .arg("-C")
        .arg(temp_dir.path())
        .arg("parse")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 parsed, 1 malformed"))
        .stderr(predicate::str::contains("bad.json"));
}

#[test]
fn test_parse_strict_fails_on_malformed() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "bad.json", b"{ not json");

    selector()
        .arg("-C")
        .arg(temp_dir.path())
        .args(["parse", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed json file"));
}

#[test]
fn test_config_file_in_base_dir() {
    let project = project();
    write(
        project.path(),
        "resource-selector.toml",
        b"exclusions = [\"conf/**\"]\nsubprojects = [\"sub\"]\n",
    );

    selector()
        .arg("-C")
        .arg(project.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::diff("a.json\n"));
}

#[test]
fn test_explicit_config_file() {
    let project = project();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("settings.yaml");
    fs::write(&config_path, "exclusions:\n  - \"**/*.json\"\n").unwrap();

    selector()
        .arg("-C")
        .arg(project.path())
        .arg("--config")
        .arg(&config_path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::diff("conf/app.yaml\nconf/messages.properties\n"));
}

#[test]
fn test_config_command_shows_effective_settings() {
    let project = project();
    write(project.path(), "resource-selector.toml", b"size_threshold_mb = 4\n");

    let config = json_stdout(
        selector()
            .arg("-C")
            .arg(project.path())
            .args(["config", "--format", "json"])
            .env("RESOURCE_SELECTOR_STRICT", "true"),
    );
    assert_eq!(config["size_threshold_mb"], 4);
    assert_eq!(config["strict"], true);
    assert_eq!(config["exclusions"], serde_json::json!([]));

    selector()
        .arg("-C")
        .arg(project.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("size_threshold_mb = 4"));
}
