//! End-to-end tests for the fogbugz-mcp binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with an empty environment rooted in a temporary home and working
/// directory, so no `.env` or `fogbugz-mcp.yaml` from the host leaks in
fn isolated_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fogbugz-mcp").unwrap();
    cmd.env_clear()
        .env("HOME", home.path())
        .env("NO_COLOR", "1")
        .current_dir(home.path());
    cmd
}

fn configured_command(home: &TempDir, fogbugz_url: &str) -> Command {
    let mut cmd = isolated_command(home);
    cmd.env("FOGBUGZ_URL", fogbugz_url)
        .env("FOGBUGZ_TOKEN", "cli-token");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    isolated_command(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    isolated_command(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand_prints_help() {
    let home = TempDir::new().unwrap();
    isolated_command(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_configuration_fails_with_exit_code_2() {
    let home = TempDir::new().unwrap();
    isolated_command(&home)
        .arg("wikis")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("FOGBUGZ_URL"));
}

#[test]
fn test_serve_without_configuration_fails() {
    let home = TempDir::new().unwrap();
    isolated_command(&home)
        .args(["serve", "--transport", "sse"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("FOGBUGZ_URL"));
}

#[test]
fn test_doctor_reports_missing_configuration() {
    let home = TempDir::new().unwrap();
    isolated_command(&home)
        .arg("doctor")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("FOGBUGZ_URL is not set"));
}

#[test]
fn test_completion_script() {
    let home = TempDir::new().unwrap();
    isolated_command(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fogbugz-mcp"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_wikis_json_against_mock_fogbugz() {
    let fogbugz = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.asp"))
        .and(query_param("cmd", "listWikis"))
        .and(query_param("token", "cli-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<response><wikis><wiki><ixWiki>4</ixWiki><sWiki>Runbooks</sWiki>\
             <sTagLineHTML>Ops</sTagLineHTML><ixWikiPageRoot>9</ixWikiPageRoot>\
             </wiki></wikis></response>",
        ))
        .mount(&fogbugz)
        .await;

    let uri = fogbugz.uri();
    let output = tokio::task::spawn_blocking(move || {
        let home = TempDir::new().unwrap();
        configured_command(&home, &uri)
            .args(["wikis", "--format", "json"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{output:?}");
    let wikis: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(wikis[0]["wiki_id"], 4);
    assert_eq!(wikis[0]["name"], "Runbooks");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_view_prints_markdown() {
    let fogbugz = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("cmd", "viewArticle"))
        .and(query_param("ixWikiPage", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<response><wikipage><sHeadline>Paging</sHeadline>\
             <sBody><![CDATA[<p>Call <strong>ops</strong> first.</p>]]></sBody>\
             <nRevision>1</nRevision></wikipage></response>",
        ))
        .mount(&fogbugz)
        .await;

    let uri = fogbugz.uri();
    let output = tokio::task::spawn_blocking(move || {
        let home = TempDir::new().unwrap();
        configured_command(&home, &uri)
            .args(["view", "9"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("# Paging"));
    assert!(stdout.contains("Call **ops** first."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_azure_client_env_file_takes_precedence() {
    let fogbugz = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("cmd", "listWikis"))
        .and(query_param("token", "azure-env-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<response><wikis><wiki><ixWiki>5</ixWiki><sWiki>Playbooks</sWiki>\
             <sTagLineHTML>Ops</sTagLineHTML><ixWikiPageRoot>1</ixWikiPageRoot>\
             </wiki></wikis></response>",
        ))
        .mount(&fogbugz)
        .await;

    let uri = fogbugz.uri();
    let output = tokio::task::spawn_blocking(move || {
        let home = TempDir::new().unwrap();
        std::fs::write(
            home.path().join(".env"),
            "FOGBUGZ_URL=http://127.0.0.1:9\nFOGBUGZ_TOKEN=cwd-token\n",
        )
        .unwrap();
        let client_dir = home.path().join("azure-openai-client");
        std::fs::create_dir(&client_dir).unwrap();
        std::fs::write(
            client_dir.join(".env"),
            format!("FOGBUGZ_URL={uri}\nFOGBUGZ_TOKEN=azure-env-token\n"),
        )
        .unwrap();

        isolated_command(&home)
            .args(["wikis", "--format", "json"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{output:?}");
    let wikis: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(wikis[0]["name"], "Playbooks");
}
