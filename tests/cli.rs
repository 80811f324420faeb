//! Command-line behaviour of the `tpmstore` binary.

#![cfg(feature = "http")]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::process::{Command, Output};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/index.php/api/v4";

fn tpmstore_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tpmstore").unwrap();
    cmd.env_remove("TPMSTORE_LOG")
        .env_remove("TPMSTORE_TIMEOUT")
        .env("NO_COLOR", "1");
    cmd
}

/// Runs the binary off the async runtime so the local server keeps serving.
async fn run_cli(args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || tpmstore_cmd().args(&args).output().unwrap())
        .await
        .unwrap()
}

fn args(server: &MockServer, flags: &[&str], extra: &[&str]) -> Vec<String> {
    let mut args: Vec<String> = flags.iter().map(|s| s.to_string()).collect();
    args.extend([server.uri(), "tpmuser".to_string(), "tpmpass".to_string()]);
    args.extend(extra.iter().map(|s| s.to_string()));
    args
}

async fn mount_entry(server: &MockServer, name: &str, id: u64, entry: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("{}/passwords/search/name:[{}]/page/1.json", API, name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": id}])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/passwords/{}.json", API, id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry))
        .mount(server)
        .await;
}

#[test]
fn test_too_few_terms_fails() {
    tpmstore_cmd()
        .args(["https://tpm.example.com", "tpmuser", "tpmpass"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("At least 4 arguments required."));
}

#[test]
fn test_no_terms_is_usage_error() {
    tpmstore_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_invalid_url_fails() {
    tpmstore_cmd()
        .args(["ftp://foo.bar", "tpmuser", "tpmpass", "name=dostuff"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "First argument has to be a valid URL to TeamPasswordManager API: ftp://foo.bar",
        ));
}

#[test]
fn test_invalid_create_value_fails() {
    tpmstore_cmd()
        .args(["https://tpm.example.com", "u", "p", "name=db", "create=Foo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "create can only be True or False and not: Foo",
        ));
}

#[tokio::test]
async fn test_plain_output() {
    let server = MockServer::start().await;
    mount_entry(
        &server,
        "db",
        42,
        json!({"id": 42, "name": "db", "password": "foobar", "username": "admin"}),
    )
    .await;

    let output = run_cli(args(&server, &[], &["name=db", "return_value=username"])).await;
    output.assert().success().stdout("admin\n");
}

#[tokio::test]
async fn test_json_output() {
    let server = MockServer::start().await;
    mount_entry(
        &server,
        "db",
        42,
        json!({"id": 42, "name": "db", "password": "foobar"}),
    )
    .await;

    let output = run_cli(args(&server, &["--json"], &["name=db"])).await;
    assert!(output.status.success(), "{:?}", output);

    let values: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(values, vec!["foobar"]);
}

#[tokio::test]
async fn test_no_match_exits_with_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/passwords/search/name:[missing]/page/1.json", API)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let output = run_cli(args(&server, &[], &["name=missing"])).await;
    output
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Found no match for: missing"));
}

#[tokio::test]
async fn test_update_notice_goes_to_stderr() {
    let server = MockServer::start().await;
    mount_entry(
        &server,
        "db",
        42,
        json!({"id": 42, "name": "db", "password": "old"}),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/passwords/42.json", API)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(args(
        &server,
        &[],
        &["name=db", "create=True", "password=newpw"],
    ))
    .await;

    output
        .assert()
        .success()
        .stdout("newpw\n")
        .stderr(predicate::str::contains("Will update entry \"db\" with ID \"42\""));
}
