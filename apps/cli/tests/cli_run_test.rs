//! Integration tests for the `herald` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `herald` command isolated from the developer's own config files.
fn herald(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.current_dir(temp_dir.path()).env("HOME", temp_dir.path());
    cmd
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("each line should be a JSON event"))
        .collect()
}

#[test]
fn test_version_and_help() {
    let temp_dir = TempDir::new().unwrap();
    herald(&temp_dir).arg("--version").assert().success().stdout(predicate::str::contains("herald"));
    herald(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("strings"));
}

#[test]
fn test_run_completes_with_json_events() {
    let temp_dir = TempDir::new().unwrap();
    let assert =
        herald(&temp_dir).args(["run", "--json", "--batches", "2", "--step-ms", "5"]).assert().success();

    let events = json_lines(&assert.get_output().stdout);
    let first = events.first().unwrap();
    assert_eq!(first["event"], "report");
    assert_eq!(first["title"], "Opening database");
    assert_eq!(first["cancelable"], false);

    let last = events.last().unwrap();
    assert_eq!(last["event"], "finished");
    assert_eq!(last["outcome"]["status"], "completed");
}

#[test]
fn test_run_cancel_after_reports() {
    let temp_dir = TempDir::new().unwrap();
    let assert = herald(&temp_dir)
        .args(["run", "--json", "--cancel-after", "2", "--step-ms", "200"])
        .assert()
        .success();

    let events = json_lines(&assert.get_output().stdout);
    let decrypting = &events[1];
    assert_eq!(decrypting["title"], "Decrypting database");
    assert_eq!(decrypting["warning"], "Do not kill the app during this process");
    assert_eq!(decrypting["cancelable"], true);

    assert!(events.iter().any(|event| event["event"] == "cancel" && event["result"] == "requested"));
    assert_eq!(events.last().unwrap()["outcome"]["status"], "canceled");
}

#[test]
fn test_run_reports_not_cancelable_step() {
    let temp_dir = TempDir::new().unwrap();
    let assert = herald(&temp_dir)
        .args(["run", "--json", "--cancel-after", "1", "--batches", "1", "--step-ms", "20"])
        .assert()
        .success();

    let events = json_lines(&assert.get_output().stdout);
    assert_eq!(events[1]["event"], "cancel");
    assert_eq!(events[1]["result"], "not_cancelable");
    assert_eq!(events.last().unwrap()["outcome"]["status"], "completed");
}

#[test]
fn test_run_failure_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    herald(&temp_dir)
        .args(["run", "--fail-after", "0", "--step-ms", "5"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed"))
        .stderr(predicate::str::contains("corrupted entry block"));
}

#[test]
fn test_run_human_output() {
    let temp_dir = TempDir::new().unwrap();
    herald(&temp_dir)
        .args(["run", "--batches", "1", "--step-ms", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Opening database"))
        .stdout(predicate::str::contains("Reading header"))
        .stdout(predicate::str::contains("Completed"));
}

#[test]
fn test_strings_table_and_json() {
    let temp_dir = TempDir::new().unwrap();
    herald(&temp_dir)
        .arg("strings")
        .assert()
        .success()
        .stdout(predicate::str::contains("String Table (10)"))
        .stdout(predicate::str::contains("0x7f120002"));

    let assert = herald(&temp_dir).args(["strings", "--json"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let entries: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 10);
    assert_eq!(entries[0]["id"], "0x7f120001");
    assert_eq!(entries[0]["text"], "Opening database");
}

#[test]
fn test_strings_override_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fr.toml");
    std::fs::write(&path, "[strings]\n\"0x7f120001\" = \"Ouverture de la base\"\n").unwrap();

    let assert = herald(&temp_dir)
        .args(["run", "--json", "--batches", "1", "--step-ms", "5", "--strings"])
        .arg(&path)
        .assert()
        .success();
    let events = json_lines(&assert.get_output().stdout);
    assert_eq!(events[0]["title"], "Ouverture de la base");
}

#[test]
fn test_strings_override_rejects_bad_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "[strings]\ntitle = \"Nope\"\n").unwrap();

    herald(&temp_dir)
        .arg("strings")
        .arg("--strings")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid string table"));
}

#[test]
fn test_local_config_selects_json_output() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(".heraldrc"), "batches = 1\nstep_ms = 5\n\n[output]\nformat = \"json\"\n")
        .unwrap();

    let assert = herald(&temp_dir).arg("run").assert().success();
    let events = json_lines(&assert.get_output().stdout);
    assert_eq!(events.last().unwrap()["outcome"]["status"], "completed");
    assert_eq!(events.iter().filter(|event| event["title"] == "Loading entries").count(), 1);
}

#[test]
fn test_config_command_shows_merged_values() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join(".herald")).unwrap();
    std::fs::write(temp_dir.path().join(".herald").join("config.toml"), "batches = 7\nstep_ms = 50\n").unwrap();
    std::fs::write(temp_dir.path().join(".heraldrc"), "step_ms = 10\n").unwrap();

    herald(&temp_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("batches = 7"))
        .stdout(predicate::str::contains("step_ms = 10"))
        .stdout(predicate::str::contains("format = \"human\""));
}

#[test]
fn test_malformed_config_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(".heraldrc"), "step_ms = \"soon\"\n").unwrap();

    herald(&temp_dir)
        .args(["run", "--batches", "1", "--step-ms", "5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring configuration file"));
}
