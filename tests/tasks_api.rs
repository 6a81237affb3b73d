//! End-to-end tests for the HTTP task routes.
//! Spins up the server on a random port and speaks raw HTTP over TcpStream.

use std::sync::Arc;

use taskd::{
    config::TaskdConfig,
    rest,
    storage::Storage,
    tasks::{SqliteTaskRepository, TaskService},
    AppContext,
};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Find a free local port by binding to port 0.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Build a minimal AppContext on a random port for testing.
async fn make_test_ctx(dir: &TempDir, port: u16) -> Arc<AppContext> {
    let data_dir = dir.path().to_path_buf();
    let config = Arc::new(TaskdConfig::new(
        Some(port),
        Some(data_dir.clone()),
        Some("error".to_string()),
        None,
    ));
    let storage = Arc::new(Storage::new(&data_dir).await.unwrap());
    let tasks = Arc::new(TaskService::new(Arc::new(SqliteTaskRepository::new(
        storage.pool(),
    ))));
    Arc::new(AppContext {
        config,
        storage,
        tasks,
        started_at: std::time::Instant::now(),
    })
}

/// Start the server in the background and give it a moment to bind.
async fn start_server(dir: &TempDir) -> u16 {
    let port = find_free_port();
    let ctx = make_test_ctx(dir, port).await;
    tokio::spawn(async move {
        let _ = rest::start_rest_server(ctx).await;
    });
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    port
}

/// Send one raw HTTP request; returns (status line, lowercased headers, body).
async fn send_request(port: u16, request: &str) -> (String, String, String) {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{port}"))
        .await
        .unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    let response = String::from_utf8_lossy(&buf).to_string();

    let body_start = response
        .find("\r\n\r\n")
        .map(|i| i + 4)
        .unwrap_or(response.len());
    let head = response[..body_start].to_lowercase();
    let body = response[body_start..].to_string();
    let status_line = response.lines().next().unwrap_or("").to_string();
    (status_line, head, body)
}

async fn http_get(port: u16, path: &str) -> (String, String, String) {
    send_request(
        port,
        &format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"),
    )
    .await
}

async fn http_post_form(port: u16, path: &str, body: &str) -> (String, String, String) {
    send_request(
        port,
        &format!(
            "POST {path} HTTP/1.1\r\nHost: localhost\r\n\
             Content-Type: application/x-www-form-urlencoded\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ),
    )
    .await
}

/// GET /tasks and parse the JSON body.
async fn fetch_list(port: u16) -> Vec<serde_json::Value> {
    let (status, _, body) = http_get(port, "/tasks").await;
    assert!(status.contains("200"), "expected 200, got: {status}");
    let json: serde_json::Value = serde_json::from_str(&body).expect("list body is not valid JSON");
    json["tasks"].as_array().expect("tasks array").clone()
}

fn assert_redirects_to_list(status: &str, head: &str) {
    assert!(status.contains("303"), "expected 303, got: {status}");
    assert!(
        head.contains("location: /tasks"),
        "expected Location: /tasks, got: {head}"
    );
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = TempDir::new().unwrap();
    let port = start_server(&dir).await;

    let (status, head, body) = http_get(port, "/health").await;
    assert!(status.contains("200"), "expected 200, got: {status}");
    assert!(head.contains("content-type: application/json"));

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"].as_str().unwrap(), env!("CARGO_PKG_VERSION"));
    assert_eq!(json["port"].as_u64().unwrap(), port as u64);
}

#[tokio::test]
async fn list_starts_empty() {
    let dir = TempDir::new().unwrap();
    let port = start_server(&dir).await;

    assert!(fetch_list(port).await.is_empty());
}

#[tokio::test]
async fn create_toggle_delete_roundtrip() {
    let dir = TempDir::new().unwrap();
    let port = start_server(&dir).await;

    // Create
    let (status, head, _) = http_post_form(port, "/tasks", "title=Buy+milk").await;
    assert_redirects_to_list(&status, &head);

    let tasks = fetch_list(port).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Buy milk");
    assert_eq!(tasks[0]["completed"], false);
    let id = tasks[0]["id"].as_str().unwrap().to_string();

    // Toggle
    let (status, head, _) = http_post_form(port, &format!("/tasks/{id}/toggle"), "").await;
    assert_redirects_to_list(&status, &head);
    let tasks = fetch_list(port).await;
    assert_eq!(tasks[0]["completed"], true);

    // Delete
    let (status, head, _) = http_post_form(port, &format!("/tasks/{id}/delete"), "").await;
    assert_redirects_to_list(&status, &head);
    assert!(fetch_list(port).await.is_empty());
}

#[tokio::test]
async fn newest_first_over_http() {
    let dir = TempDir::new().unwrap();
    let port = start_server(&dir).await;

    for title in ["title=one", "title=two", "title=three"] {
        let (status, _, _) = http_post_form(port, "/tasks", title).await;
        assert!(status.contains("303"));
    }

    let titles: Vec<String> = fetch_list(port)
        .await
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["three", "two", "one"]);
}

#[tokio::test]
async fn toggle_accepts_get() {
    let dir = TempDir::new().unwrap();
    let port = start_server(&dir).await;

    http_post_form(port, "/tasks", "title=via+get").await;
    let id = fetch_list(port).await[0]["id"].as_str().unwrap().to_string();

    let (status, head, _) = http_get(port, &format!("/tasks/{id}/toggle")).await;
    assert_redirects_to_list(&status, &head);
    assert_eq!(fetch_list(port).await[0]["completed"], true);
}

#[tokio::test]
async fn unknown_id_is_404() {
    let dir = TempDir::new().unwrap();
    let port = start_server(&dir).await;

    let (status, _, body) = http_post_form(port, "/tasks/no-such-id/toggle", "").await;
    assert!(status.contains("404"), "expected 404, got: {status}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("not found"));

    let (status, _, _) = http_post_form(port, "/tasks/no-such-id/delete", "").await;
    assert!(status.contains("404"), "expected 404, got: {status}");
}

#[tokio::test]
async fn empty_title_is_400() {
    let dir = TempDir::new().unwrap();
    let port = start_server(&dir).await;

    let (status, _, body) = http_post_form(port, "/tasks", "title=").await;
    assert!(status.contains("400"), "expected 400, got: {status}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("empty"));

    // Missing field entirely behaves the same.
    let (status, _, _) = http_post_form(port, "/tasks", "").await;
    assert!(status.contains("400"), "expected 400, got: {status}");

    assert!(fetch_list(port).await.is_empty());
}
