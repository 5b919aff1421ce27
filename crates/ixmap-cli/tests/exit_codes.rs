//! Runs the `ixmap` binary against a local HTTP server and checks its exit
//! status, output file and `--json` summary.

use std::path::Path;
use std::process::{Command, Output};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = include_str!("../../ixmap/tests/fixtures/peeringdb_net.html");

// ── helpers ──

async fn serve(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/net/457"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn ixmap(args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_ixmap"))
            .args(&args)
            .env_remove("IXMAP_URL")
            .env_remove("IXMAP_OUTPUT")
            .env_remove("IXMAP_TIMEOUT_SECS")
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

fn args_for(url: &str, output: &Path, extra: &[&str]) -> Vec<String> {
    let mut args = vec![
        "--url".to_string(),
        url.to_string(),
        "-o".to_string(),
        output.display().to_string(),
        "--timeout".to_string(),
        "5".to_string(),
    ];
    args.extend(extra.iter().map(|a| a.to_string()));
    args
}

// ── exit status ──

#[tokio::test]
async fn fixture_page_exits_zero_and_writes_map() {
    let server = serve(200, FIXTURE).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.txt");

    let result = ixmap(args_for(&format!("{}/net/457", server.uri()), &out, &[])).await;

    assert_eq!(result.status.code(), Some(0));
    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), 3);
}

#[tokio::test]
async fn empty_page_exits_one_without_output() {
    let server = serve(200, "<html><body>No exchanges</body></html>").await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.txt");

    let result = ixmap(args_for(&format!("{}/net/457", server.uri()), &out, &[])).await;

    assert_eq!(result.status.code(), Some(1));
    assert!(!out.exists());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("WARN"));
}

#[tokio::test]
async fn unreachable_server_exits_one() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.txt");

    let url = format!("http://127.0.0.1:{port}/net/457");
    let result = ixmap(args_for(&url, &out, &[])).await;

    assert_eq!(result.status.code(), Some(1));
    assert!(!out.exists());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("HTTP request failed"));
}

#[tokio::test]
async fn invalid_url_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.txt");

    let result = ixmap(args_for("ftp://example.com/net/457", &out, &[])).await;

    assert_eq!(result.status.code(), Some(1));
    assert!(!out.exists());
}

// ── --json ──

#[tokio::test]
async fn json_flag_prints_summary() {
    let server = serve(200, FIXTURE).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.txt");

    let result = ixmap(args_for(
        &format!("{}/net/457", server.uri()),
        &out,
        &["--json"],
    ))
    .await;

    assert_eq!(result.status.code(), Some(0));
    let summary: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(summary["status"], 200);
    assert_eq!(summary["records"], 3);
    assert_eq!(summary["ipv4"], 2);
    assert_eq!(summary["ipv6"], 1);
}
