//! Integration tests for the development server.
//!
//! Drive the router in-process, a real listener over TCP, and the watch loop
//! against a real file tree.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tower::ServiceExt;
use watchdoc::dev::{
    DebounceDispatcher, DevServer, DevServerState, FileWatcher, LiveReloadTarget, WatchLoop,
    RELOAD_CLIENT_SCRIPT, RELOAD_MESSAGE,
};

const PAGE: &str = "<html><body><h1>Docs</h1></body></html>";

fn site() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = temp.path().canonicalize().unwrap();
    std::fs::write(root.join("index.html"), PAGE).unwrap();
    std::fs::write(root.join("data.json"), r#"{"body":"</body>"}"#).unwrap();
    (temp, root)
}

fn server(root: &Path) -> (DevServer, Arc<DevServerState>) {
    let state = Arc::new(DevServerState::new(root.to_path_buf()));
    let server = DevServer::new("127.0.0.1:0".parse().unwrap(), state.clone());
    (server, state)
}

/// Watch `root` (plus `sources`) and feed changes to `state`'s browsers.
fn spawn_watch_loop(
    state: &DevServerState,
    root: &Path,
    sources: Vec<PathBuf>,
    command: Option<String>,
) -> JoinHandle<()> {
    let mut targets = vec![root.to_path_buf()];
    targets.extend(sources.iter().cloned());

    let (watcher, stream) = FileWatcher::new(&targets).unwrap();
    let dispatcher = DebounceDispatcher::new(root.to_path_buf(), sources, command);
    let target = Arc::new(LiveReloadTarget::new(state.broadcaster()));
    tokio::spawn(WatchLoop::new(dispatcher, target).with_watcher(watcher).run(stream))
}

async fn wait_for_clients(state: &DevServerState, expected: usize) {
    timeout(Duration::from_secs(5), async {
        while state.client_count() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

async fn get(server: &DevServer, uri: &str) -> axum::response::Response {
    server
        .router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_served_html_gets_reload_client() {
    let (_temp, root) = site();
    let (server, _state) = server(&root);

    let response = get(&server, "/index.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CONTENT_LENGTH).is_none());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    let expected = format!("<h1>Docs</h1>{}</body></html>", RELOAD_CLIENT_SCRIPT);
    assert!(body.ends_with(&expected));
    assert_eq!(body.matches("<script>").count(), 1);
}

#[tokio::test]
async fn test_directory_index_gets_reload_client() {
    let (_temp, root) = site();
    let (server, _state) = server(&root);

    let response = get(&server, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains(RELOAD_CLIENT_SCRIPT));
}

#[tokio::test]
async fn test_non_html_passes_through() {
    let (_temp, root) = site();
    let (server, _state) = server(&root);

    let response = get(&server, "/data.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CONTENT_LENGTH).is_some());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], br#"{"body":"</body>"}"#);
}

#[tokio::test]
async fn test_listener_serves_over_tcp() {
    let (_temp, root) = site();
    let (server, _state) = server(&root);

    let listener = server.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(server.serve(listener));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /index.html HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut response = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .unwrap()
        .unwrap();
    let response = String::from_utf8_lossy(&response);

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("new WebSocket"));

    handle.abort();
}

#[tokio::test]
async fn test_output_change_reloads_connected_browsers() {
    let (_temp, root) = site();
    let state = Arc::new(DevServerState::new(root.clone()));
    let mut first = state.registry.register();
    let mut second = state.registry.register();

    let handle = spawn_watch_loop(&state, &root, Vec::new(), None);

    // Let the OS watch settle before editing
    tokio::time::sleep(Duration::from_millis(100)).await;
    std::fs::write(root.join("index.html"), "<html><body>v2</body></html>").unwrap();

    let message = timeout(Duration::from_secs(10), first.recv()).await.unwrap();
    assert_eq!(message.as_deref(), Some(RELOAD_MESSAGE));
    let message = timeout(Duration::from_secs(10), second.recv()).await.unwrap();
    assert_eq!(message.as_deref(), Some(RELOAD_MESSAGE));

    handle.abort();
}

#[cfg(unix)]
#[tokio::test]
async fn test_source_change_runs_command_then_reloads() {
    let (_temp, root) = site();
    let sources = TempDir::new().unwrap();
    let source_root = sources.path().canonicalize().unwrap();

    let state = Arc::new(DevServerState::new(root.clone()));
    let mut conn = state.registry.register();

    let command = format!(
        "cp {} {}",
        source_root.join("page.html").display(),
        root.join("page.html").display()
    );
    let handle = spawn_watch_loop(&state, &root, vec![source_root.clone()], Some(command));

    tokio::time::sleep(Duration::from_millis(100)).await;
    std::fs::write(source_root.join("page.html"), PAGE).unwrap();

    let message = timeout(Duration::from_secs(10), conn.recv()).await.unwrap();
    assert_eq!(message.as_deref(), Some(RELOAD_MESSAGE));
    assert!(root.join("page.html").exists());

    handle.abort();
}

#[tokio::test]
async fn test_directory_created_after_startup_is_watched() {
    let (_temp, root) = site();
    let state = Arc::new(DevServerState::new(root.clone()));
    let mut conn = state.registry.register();
    let handle = spawn_watch_loop(&state, &root, Vec::new(), None);

    tokio::time::sleep(Duration::from_millis(100)).await;
    std::fs::create_dir(root.join("sub")).unwrap();

    let message = timeout(Duration::from_secs(10), conn.recv()).await.unwrap();
    assert_eq!(message.as_deref(), Some(RELOAD_MESSAGE));

    // Past the quiet period, so the next write is its own burst
    tokio::time::sleep(Duration::from_millis(300)).await;
    std::fs::write(root.join("sub").join("page.html"), PAGE).unwrap();

    let message = timeout(Duration::from_secs(10), conn.recv()).await.unwrap();
    assert_eq!(message.as_deref(), Some(RELOAD_MESSAGE));

    handle.abort();
}

#[tokio::test]
async fn test_reload_socket_lifecycle() {
    let (_temp, root) = site();
    let (server, state) = server(&root);

    let listener = server.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(server.serve(listener));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"GET /ws HTTP/1.1\r\n\
              Host: localhost\r\n\
              Origin: http://example.com\r\n\
              Upgrade: websocket\r\n\
              Connection: Upgrade\r\n\
              Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
              Sec-WebSocket-Version: 13\r\n\r\n",
        )
        .await
        .unwrap();

    let mut head = Vec::new();
    timeout(Duration::from_secs(5), async {
        let mut byte = [0u8; 1];
        while !head.ends_with(b"\r\n\r\n") {
            stream.read_exact(&mut byte).await.unwrap();
            head.push(byte[0]);
        }
    })
    .await
    .unwrap();
    assert!(String::from_utf8_lossy(&head).starts_with("HTTP/1.1 101"));

    wait_for_clients(&state, 1).await;
    assert_eq!(state.broadcaster().reload(), 1);

    // Unmasked text frame, FIN set, 6-byte payload
    let mut frame = [0u8; 8];
    timeout(Duration::from_secs(5), stream.read_exact(&mut frame))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(&frame[..2], &[0x81, 6]);
    assert_eq!(&frame[2..], RELOAD_MESSAGE.as_bytes());

    // Masked close frame with an empty payload
    stream.write_all(&[0x88, 0x80, 0, 0, 0, 0]).await.unwrap();
    wait_for_clients(&state, 0).await;

    handle.abort();
}
