// tests/http_status_api.rs

mod common;
use crate::common::{TestResult, init_tracing, with_timeout};

use std::time::Duration;

use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use status_reporter::config::ApiSettings;
use status_reporter::errors::ReporterError;
use status_reporter::report::{HttpStatusApi, StatusApi, WorkflowEvent};

/// One captured HTTP request.
struct Captured {
    head: String,
    body: String,
}

/// Serve exactly one request with the given status line and body.
async fn serve_once(status_line: &'static str, body: &'static str) -> (Url, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = Url::parse(&format!("http://{addr}/api/events")).unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let (head, body_start) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break (String::from_utf8_lossy(&buf[..pos]).to_string(), pos + 4);
            }
        };

        let length: usize = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < body_start + length {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body = String::from_utf8_lossy(&buf[body_start..body_start + length]).to_string();

        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        Captured {
            head,
            body: request_body,
        }
    });

    (url, handle)
}

fn settings(url: Url) -> ApiSettings {
    ApiSettings {
        url,
        token: "secret-token".to_string(),
        tls_reject_unauthorized: true,
        timeout: Some(Duration::from_secs(5)),
    }
}

#[tokio::test]
async fn posts_json_event_with_auth_header() -> TestResult {
    init_tracing();

    let (url, server) = serve_once("200 OK", r#"{"ok":true}"#).await;
    let api = HttpStatusApi::new(&settings(url))?;

    let body = with_timeout(api.send(WorkflowEvent::report_status("build", "running", None))).await?;
    assert_eq!(body, r#"{"ok":true}"#);

    let captured = server.await?;
    let head = captured.head.to_lowercase();
    assert!(head.starts_with("post /api/events "), "head: {head}");
    assert!(head.contains("authorization: secret-token"));
    assert!(head.contains("content-type: application/json"));
    assert!(head.contains("user-agent: status-reporter/"));

    let json: serde_json::Value = serde_json::from_str(&captured.body)?;
    assert_eq!(
        json,
        serde_json::json!({ "action": "report-status", "step": "build", "status": "running" })
    );
    Ok(())
}

#[tokio::test]
async fn status_400_and_above_is_an_error() -> TestResult {
    let (url, server) = serve_once("401 Unauthorized", r#"{"message":"bad token"}"#).await;
    let api = HttpStatusApi::new(&settings(url))?;

    let err = with_timeout(api.send(WorkflowEvent::start())).await.unwrap_err();

    match err {
        ReporterError::ApiError { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("bad token"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    server.await?;
    Ok(())
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() -> TestResult {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let url = Url::parse(&format!("http://{addr}/api/events"))?;
    let api = HttpStatusApi::new(&settings(url))?;

    let err = with_timeout(api.send(WorkflowEvent::start())).await.unwrap_err();
    assert!(matches!(err, ReporterError::HttpError(_)), "got {err:?}");
    Ok(())
}

#[test]
fn token_with_newline_is_rejected() {
    let mut settings = settings(Url::parse("http://localhost/api/events").unwrap());
    settings.token = "bad\ntoken".to_string();

    let err = HttpStatusApi::new(&settings).unwrap_err();
    assert!(matches!(err, ReporterError::ConfigError(_)));
}
