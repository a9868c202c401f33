use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("post-sync");
    cmd.current_dir(dir.path())
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("database_path"));
    assert!(content.contains("jsonplaceholder.typicode.com"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# mine\n").expect("write config");

    let mut cmd = cargo_bin_cmd!("post-sync");
    cmd.current_dir(dir.path())
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let content = fs::read_to_string(&config_path).expect("read config");
    assert_eq!(content, "# mine\n");
}

#[test]
fn config_show_applies_env_overrides() {
    let dir = TempDir::new().expect("temp dir");

    let mut cmd = cargo_bin_cmd!("post-sync");
    cmd.current_dir(dir.path())
        .env("POST_SYNC__SERVER__BIND_ADDR", "0.0.0.0:9999")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0.0.0:9999"));
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");

    let mut cmd = cargo_bin_cmd!("post-sync");
    cmd.current_dir(dir.path())
        .args(["--config", "does-not-exist.toml", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn users_on_empty_store_outputs_empty_json() {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("posts.sqlite");

    let mut cmd = cargo_bin_cmd!("post-sync");
    let output = cmd
        .current_dir(dir.path())
        .env("POST_SYNC__STORE__DATABASE_PATH", &db_path)
        .args(["users", "--json"])
        .output()
        .expect("run users");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value, serde_json::json!([]));
    assert!(db_path.exists());
}

#[test]
fn doctor_offline_reports_store() {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("posts.sqlite");

    let mut cmd = cargo_bin_cmd!("post-sync");
    let output = cmd
        .current_dir(dir.path())
        .env("POST_SYNC__STORE__DATABASE_PATH", &db_path)
        .args(["doctor", "--offline", "--json"])
        .output()
        .expect("run doctor");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["config"]["status"], "ok");
    assert_eq!(value["store"]["status"], "ok");
    assert_eq!(value["external_api"]["status"], "warn");
    assert_eq!(value["overall"], "warn");
}

#[test]
fn config_show_includes_general_log_level() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[general]\nlog_level = \"debug\"\n").expect("write config");

    let mut cmd = cargo_bin_cmd!("post-sync");
    cmd.current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[general]"))
        .stdout(predicate::str::contains("log_level = \"debug\""));
}

#[test]
fn users_does_not_touch_external_api() {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("posts.sqlite");

    let mut cmd = cargo_bin_cmd!("post-sync");
    cmd.current_dir(dir.path())
        .env("POST_SYNC__STORE__DATABASE_PATH", &db_path)
        .env("POST_SYNC__EXTERNAL_API__BASE_URL", "not a url")
        .env("POST_SYNC__EXTERNAL_API__TIMEOUT_SECS", "0")
        .arg("users")
        .assert()
        .success()
        .stdout(predicate::str::contains("No posts stored"));
}
