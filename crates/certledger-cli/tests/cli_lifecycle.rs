//! End-to-end tests driving the `certledger` binary against a temporary
//! `SQLite` ledger.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const ADMIN: &str = "password123";
const ADMIN_HASH: &str = "ef92b778bafe771e89245b89ecbc08a44a4e166c06659911881f383d4473e94f";

/// Returns the path to the `certledger` binary built by Cargo.
fn certledger_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_certledger"))
}

/// Writes a config pointing at a ledger inside `dir`.
fn setup(seed: bool) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("certledger.toml");
    let db = dir.path().join("ledger.db");
    std::fs::write(
        &config,
        format!(
            "[ledger]\nbackend = \"sqlite\"\npath = \"{}\"\n\n[access]\nadmin_credential_hash = \"{ADMIN_HASH}\"\n\n[seed]\nenabled = {seed}\n",
            db.display()
        ),
    )
    .expect("write config");
    (dir, config)
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(certledger_bin())
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("CERTLEDGER_CREDENTIAL")
        .output()
        .expect("spawn certledger")
}

fn run_ok_json(config: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run(config, &full);
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

/// Parses the JSON error report, the last line of stderr.
fn error_json(output: &Output) -> Value {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr.lines().last().expect("stderr is empty");
    serde_json::from_str(line).expect("stderr ends with JSON")
}

#[test]
fn test_submit_evaluate_verify() {
    let (_dir, config) = setup(false);

    let submitted = run_ok_json(&config, &["submit", "Mattia", "Pandoro", "D.O.P."]);
    let id = submitted["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 64);

    let verify = run_ok_json(&config, &["verify", &id]);
    assert_eq!(verify["valid"], Value::Bool(false));

    let pending = run_ok_json(&config, &["--credential", ADMIN, "pending"]);
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["ExpireDate"], "1980-01-01");

    let approved = run_ok_json(
        &config,
        &["--credential", ADMIN, "evaluate", &id, "--approve"],
    );
    assert_eq!(approved["outcome"], "approved");
    assert_eq!(approved["asset"]["Renew"], Value::Bool(false));

    let verify = run_ok_json(&config, &["verify", &id]);
    assert_eq!(verify["valid"], Value::Bool(true));

    let certificates = run_ok_json(&config, &["certificates"]);
    assert_eq!(certificates[0]["ID"], id.as_str());
}

#[test]
fn test_renewal_cycle_and_invalidation() {
    let (_dir, config) = setup(false);
    let id = run_ok_json(&config, &["submit", "Simone", "Cotechino", "I.G.P."])["id"]
        .as_str()
        .unwrap()
        .to_string();
    run_ok_json(
        &config,
        &["--credential", ADMIN, "evaluate", &id, "--approve"],
    );

    let requested = run_ok_json(&config, &["request-renewal", &id]);
    assert_eq!(requested["Renew"], Value::Bool(true));

    run_ok_json(&config, &["--credential", ADMIN, "renew", &id]);
    let second = run(&config, &["--json", "--credential", ADMIN, "renew", &id]);
    assert_eq!(second.status.code(), Some(1));
    let err = error_json(&second);
    assert_eq!(err["code"], "no_renewal_request");

    run_ok_json(&config, &["--credential", ADMIN, "invalidate", &id]);
    let verify = run_ok_json(&config, &["verify", &id]);
    assert_eq!(verify["valid"], Value::Bool(false));
}

#[test]
fn test_privileged_commands_need_credential() {
    let (_dir, config) = setup(false);
    let id = run_ok_json(&config, &["submit", "a", "b", "c"])["id"]
        .as_str()
        .unwrap()
        .to_string();

    let missing = run(&config, &["evaluate", &id, "--approve"]);
    assert_eq!(missing.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("CERTLEDGER_CREDENTIAL"));

    let wrong = run(
        &config,
        &["--json", "--credential", "nope", "evaluate", &id, "--approve"],
    );
    assert_eq!(wrong.status.code(), Some(1));
    let err = error_json(&wrong);
    assert_eq!(err["code"], "unauthorized");

    // The submission is untouched.
    let shown = run_ok_json(&config, &["show", &id]);
    assert_eq!(shown["ExpireDate"], "1980-01-01");
}

#[test]
fn test_credential_from_environment() {
    let (_dir, config) = setup(true);
    run_ok_json(&config, &["init"]);

    let output = Command::new(certledger_bin())
        .arg("--config")
        .arg(&config)
        .args(["--json", "list"])
        .env("CERTLEDGER_CREDENTIAL", ADMIN)
        .output()
        .expect("spawn certledger");
    assert!(output.status.success());
    let all: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[test]
fn test_init_seeds_once() {
    let (_dir, config) = setup(true);
    assert_eq!(run_ok_json(&config, &["init"])["seeded"], Value::Bool(true));
    assert_eq!(run_ok_json(&config, &["init"])["seeded"], Value::Bool(false));

    let listed = run(&config, &["--credential", ADMIN, "list"]);
    assert!(listed.status.success());
    let table = String::from_utf8_lossy(&listed.stdout);
    assert!(table.starts_with("ID"));
    assert!(table.contains("Aglianico beneventano"));
}

#[test]
fn test_hash_credential() {
    let output = Command::new(certledger_bin())
        .args(["--credential", ADMIN, "hash-credential"])
        .output()
        .expect("spawn certledger");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), ADMIN_HASH);
}

#[test]
fn test_unknown_id_and_missing_config() {
    let (dir, config) = setup(false);
    let shown = run(&config, &["show", "does-not-exist"]);
    assert_eq!(shown.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&shown.stderr).contains("not found"));

    let absent = dir.path().join("absent.toml");
    let output = run(&absent, &["certificates"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load configuration"));
}
