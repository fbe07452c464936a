//! End-to-end tests for `runway provision` against a local mock platform.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mockito::{Matcher, Mock, Server, ServerGuard};
use predicates::prelude::*;
use tempfile::TempDir;

const TOKEN: &str = "ghp_integration";
const URL: &str = "https://quiet-river.trycloudflare.com";

struct Env {
    _dir: TempDir,
    config: String,
}

fn env() -> Env {
    let dir = TempDir::new().expect("temp dir");
    let config = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    Env { _dir: dir, config }
}

fn runway(env: &Env) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("runway"));
    cmd.env("NO_COLOR", "1")
        .env("RUNWAY_CONFIG", &env.config)
        .env_remove("GITHUB_TOKEN");
    cmd
}

fn provision(env: &Env, server: &ServerGuard) -> Command {
    let mut cmd = runway(env);
    cmd.args(["provision", "--token", TOKEN, "--attempts", "2", "--interval", "0"])
        .args(["--api-url", &server.url()]);
    cmd
}

/// Mocks authentication, creation, and both file writes.
fn platform(server: &mut ServerGuard) -> Vec<Mock> {
    vec![
        server
            .mock("GET", "/user")
            .match_header("authorization", format!("Bearer {TOKEN}").as_str())
            .with_status(200)
            .with_body(r#"{"login":"octo"}"#)
            .create(),
        server
            .mock("POST", "/user/repos")
            .match_body(Matcher::PartialJsonString(
                r#"{"private":true,"auto_init":true}"#.to_string(),
            ))
            .with_status(201)
            .with_body(r#"{"name":"repo-k3x9q2m1","owner":{"login":"octo"}}"#)
            .create(),
        server
            .mock(
                "PUT",
                Matcher::Regex(r"^/repos/octo/repo-k3x9q2m1/contents/".to_string()),
            )
            .with_status(201)
            .with_body("{}")
            .expect(2)
            .create(),
    ]
}

fn result_file(server: &mut ServerGuard) -> Mock {
    let body = serde_json::json!({
        "encoding": "base64",
        "content": STANDARD.encode(format!("{URL}\n")),
    });
    server
        .mock("GET", "/repos/octo/repo-k3x9q2m1/contents/remote.txt")
        .with_status(200)
        .with_body(body.to_string())
        .create()
}

#[test]
fn test_provision_without_token_fails_with_hint() {
    let env = env();
    runway(&env)
        .arg("provision")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing credential"))
        .stdout(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn test_provision_without_token_json_reports_error_body() {
    let env = env();
    let output = runway(&env)
        .args(["provision", "--json"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(value["status"], "error");
    assert_eq!(value["repo"], "");
    assert_eq!(value["error"], "Missing credential");
    assert_eq!(value["logs"], serde_json::json!(["missing credential"]));
}

#[test]
fn test_provision_success_prints_url() {
    let env = env();
    let mut server = Server::new();
    let mocks = platform(&mut server);
    let read = result_file(&mut server);

    provision(&env, &server)
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment ready"))
        .stdout(predicate::str::contains(URL));

    for mock in &mocks {
        mock.assert();
    }
    read.assert();
}

#[test]
fn test_provision_quiet_prints_only_url() {
    let env = env();
    let mut server = Server::new();
    let _mocks = platform(&mut server);
    let _read = result_file(&mut server);

    provision(&env, &server)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(format!("{URL}\n"));
}

#[test]
fn test_provision_json_success_body() {
    let env = env();
    let mut server = Server::new();
    let _mocks = platform(&mut server);
    let _read = result_file(&mut server);

    let output = provision(&env, &server)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(value["status"], "success");
    assert_eq!(value["url"], URL);
    let repo = value["repo"].as_str().expect("repo");
    assert!(repo.starts_with("repo-"));
    assert_eq!(repo.len(), 13);
}

#[test]
fn test_provision_public_visibility_reaches_platform() {
    let env = env();
    let mut server = Server::new();
    let _auth = server
        .mock("GET", "/user")
        .with_status(200)
        .with_body(r#"{"login":"octo"}"#)
        .create();
    let create = server
        .mock("POST", "/user/repos")
        .match_body(Matcher::PartialJsonString(r#"{"private":false}"#.to_string()))
        .with_status(403)
        .with_body(r#"{"message":"API rate limit exceeded"}"#)
        .create();

    provision(&env, &server)
        .args(["--visibility", "public"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API rate limit exceeded"));

    create.assert();
}

#[test]
fn test_provision_timeout_exits_pending() {
    let env = env();
    let mut server = Server::new();
    let _mocks = platform(&mut server);
    let reads = server
        .mock("GET", "/repos/octo/repo-k3x9q2m1/contents/remote.txt")
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .expect(2)
        .create();

    provision(&env, &server)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("not published yet"));

    reads.assert();
}

#[test]
fn test_provision_bad_credentials_fail() {
    let env = env();
    let mut server = Server::new();
    let _auth = server
        .mock("GET", "/user")
        .with_status(401)
        .with_body(r#"{"message":"Bad credentials"}"#)
        .create();
    let create = server.mock("POST", "/user/repos").expect(0).create();

    provision(&env, &server)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Bad credentials"));

    create.assert();
}

#[test]
fn test_provision_missing_descriptor_file_is_cli_error() {
    let env = env();
    let mut server = Server::new();
    let auth = server.mock("GET", "/user").expect(0).create();

    provision(&env, &server)
        .args(["--descriptor", "/nonexistent/pipeline.yml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read descriptor"));

    auth.assert();
}
