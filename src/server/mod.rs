//! Minimal HTTP API layer.
//!
//! Serves the dashboard endpoints over a plain `TcpListener`, one
//! spawned task per connection. The record store is immutable behind an
//! `Arc`, so a slow summarization call in one request never blocks
//! other requests' access to the data.

use crate::analytics::{self, AnalyticsError};
use crate::generator::RecordStore;
use crate::report;
use crate::summarizer::Summarizer;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// Upper bound on the request head we are willing to read.
const MAX_REQUEST_BYTES: usize = 8 * 1024;

/// Per-student reports are shorter than the cohort report.
const PERFORMANCE_MAX_LENGTH: usize = 200;

/// Errors raised while reading or parsing a request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Transport failure on the connection.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// The request line could not be understood.
    #[error("bad request: {0}")]
    BadRequest(String),
}

/// Shared per-process state handed to every request handler.
pub struct AppState {
    /// The immutable record store.
    pub store: Arc<RecordStore>,
    /// Injected summarization capability.
    pub summarizer: Arc<dyn Summarizer>,
    /// Minimum summary length in words.
    pub min_length: usize,
    /// Maximum summary length in words for the cohort report.
    pub max_length: usize,
}

impl AppState {
    /// Bundle the store and summarizer with the summary length window.
    pub fn new(
        store: Arc<RecordStore>,
        summarizer: Arc<dyn Summarizer>,
        min_length: usize,
        max_length: usize,
    ) -> Self {
        Self {
            store,
            summarizer,
            min_length,
            max_length,
        }
    }
}

/// A rendered HTTP response, status plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON body.
    pub body: String,
}

impl HttpResponse {
    /// 200 response with a serialized JSON payload.
    fn json_ok(value: &impl serde::Serialize) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status: 200, body },
            Err(e) => {
                error!("Response serialization failed: {}", e);
                Self::error(500, "Internal server error")
            }
        }
    }

    /// Error response with a FastAPI-style `detail` body.
    fn error(status: u16, detail: &str) -> Self {
        Self {
            status,
            body: json!({ "detail": detail }).to_string(),
        }
    }

    /// Status reason phrase for the response line.
    fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            503 => "Service Unavailable",
            _ => "Internal Server Error",
        }
    }

    /// Encode as an HTTP/1.1 response with a close-delimited body.
    fn encode(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.reason(),
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

/// Parse the request line of an HTTP request head.
pub fn parse_request(head: &str) -> Result<(String, String), ServerError> {
    let request_line = head
        .lines()
        .next()
        .ok_or_else(|| ServerError::BadRequest("empty request".to_string()))?;

    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| ServerError::BadRequest("missing method".to_string()))?;
    let path = parts
        .next()
        .ok_or_else(|| ServerError::BadRequest("missing path".to_string()))?;

    Ok((method.to_string(), path.to_string()))
}

/// Route a request to its handler and produce the response.
pub async fn route(state: &AppState, method: &str, path: &str) -> HttpResponse {
    if method != "GET" {
        return HttpResponse::error(405, "Method not allowed");
    }

    debug!("GET {}", path);

    match path {
        "/" => HttpResponse::json_ok(&json!({
            "message": "Welcome to Student Analytics Dashboard API"
        })),
        "/students" => HttpResponse::json_ok(&state.store.records()),
        "/analytics/summary" => analytics_summary(state).await,
        _ => {
            if let Some(rest) = path.strip_prefix("/students/") {
                return match rest.parse::<u32>() {
                    Ok(id) => get_student(state, id),
                    Err(_) => HttpResponse::error(400, "Invalid student id"),
                };
            }
            if let Some(rest) = path.strip_prefix("/analytics/performance/") {
                return match rest.parse::<u32>() {
                    Ok(id) => student_performance(state, id).await,
                    Err(_) => HttpResponse::error(400, "Invalid student id"),
                };
            }
            HttpResponse::error(404, "Not found")
        }
    }
}

/// `GET /students/{id}`
fn get_student(state: &AppState, id: u32) -> HttpResponse {
    match state.store.find(id) {
        Some(student) => HttpResponse::json_ok(student),
        None => HttpResponse::error(404, "Student not found"),
    }
}

/// `GET /analytics/summary`
async fn analytics_summary(state: &AppState) -> HttpResponse {
    let summary = analytics::summarize(state.store.records());
    let narrative = report::cohort_narrative(&summary);

    let insights = match state
        .summarizer
        .summarize(&narrative, state.min_length, state.max_length)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!("Summarization failed: {}", e);
            return HttpResponse::error(503, &format!("Summarization unavailable: {}", e));
        }
    };

    HttpResponse::json_ok(&json!({
        "statistics": summary,
        "insights": insights,
    }))
}

/// `GET /analytics/performance/{id}`
async fn student_performance(state: &AppState, id: u32) -> HttpResponse {
    let view = match analytics::performance_view(state.store.records(), id) {
        Ok(view) => view,
        Err(AnalyticsError::StudentNotFound(_)) => {
            return HttpResponse::error(404, "Student not found");
        }
    };

    let narrative = report::student_narrative(&view.student, view.percentile);
    let max_length = state.max_length.min(PERFORMANCE_MAX_LENGTH);

    let insights = match state
        .summarizer
        .summarize(&narrative, state.min_length, max_length)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!("Summarization failed: {}", e);
            return HttpResponse::error(503, &format!("Summarization unavailable: {}", e));
        }
    };

    HttpResponse::json_ok(&json!({
        "student": view.student,
        "percentile": view.percentile,
        "insights": insights,
    }))
}

/// Handle a single connection: read the head, route, write the response.
async fn handle_connection(mut stream: TcpStream, state: Arc<AppState>) -> Result<(), ServerError> {
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);

        if buffer.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
        if buffer.len() > MAX_REQUEST_BYTES {
            let response = HttpResponse::error(400, "Request too large");
            stream.write_all(&response.encode()).await?;
            return Ok(());
        }
    }

    let head = String::from_utf8_lossy(&buffer);
    let response = match parse_request(&head) {
        Ok((method, path)) => route(&state, &method, &path).await,
        Err(e) => {
            debug!("Rejecting malformed request: {}", e);
            HttpResponse::error(400, "Malformed request")
        }
    };

    stream.write_all(&response.encode()).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Accept connections until the process is stopped.
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Listening on http://{}", addr);

    loop {
        let (stream, peer) = listener.accept().await?;
        debug!("Accepted connection from {}", peer);

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, state).await {
                warn!("Connection from {} failed: {}", peer, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_students;
    use crate::summarizer::{DisabledSummarizer, SummarizerError};
    use async_trait::async_trait;

    /// Test double that always fails, to exercise the 503 path.
    struct FailingSummarizer;

    #[async_trait]
    impl Summarizer for FailingSummarizer {
        async fn summarize(
            &self,
            _text: &str,
            _min_length: usize,
            _max_length: usize,
        ) -> Result<String, SummarizerError> {
            Err(SummarizerError::Connect(
                "http://localhost:11434".to_string(),
            ))
        }
    }

    fn test_state(count: u32) -> AppState {
        AppState::new(
            Arc::new(RecordStore::new(generate_students(count))),
            Arc::new(DisabledSummarizer),
            100,
            250,
        )
    }

    #[test]
    fn test_parse_request() {
        let (method, path) = parse_request("GET /students HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
        assert_eq!(method, "GET");
        assert_eq!(path, "/students");

        assert!(parse_request("").is_err());
        assert!(parse_request("GET").is_err());
    }

    #[tokio::test]
    async fn test_root_liveness() {
        let state = test_state(3);
        let response = route(&state, "GET", "/").await;

        assert_eq!(response.status, 200);
        let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert!(json["message"].as_str().unwrap().contains("Student Analytics"));
    }

    #[tokio::test]
    async fn test_list_students() {
        let state = test_state(7);
        let response = route(&state, "GET", "/students").await;

        assert_eq!(response.status, 200);
        let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_get_student_by_id() {
        let state = test_state(5);

        let found = route(&state, "GET", "/students/3").await;
        assert_eq!(found.status, 200);
        let json: serde_json::Value = serde_json::from_str(&found.body).unwrap();
        assert_eq!(json["id"], 3);

        let missing = route(&state, "GET", "/students/99").await;
        assert_eq!(missing.status, 404);
        assert!(missing.body.contains("Student not found"));

        let invalid = route(&state, "GET", "/students/abc").await;
        assert_eq!(invalid.status, 400);
    }

    #[tokio::test]
    async fn test_analytics_summary() {
        let state = test_state(10);
        let response = route(&state, "GET", "/analytics/summary").await;

        assert_eq!(response.status, 200);
        let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();

        let stats = &json["statistics"];
        assert_eq!(stats["total_students"], 10);
        assert!(stats["grade_distribution"]["90-100"].is_number());
        assert!(stats["average_grade"].as_f64().unwrap() >= 60.0);

        // DisabledSummarizer echoes the narrative back.
        assert!(json["insights"]
            .as_str()
            .unwrap()
            .contains("Overall Statistics"));
    }

    #[tokio::test]
    async fn test_student_performance() {
        let state = test_state(10);
        let response = route(&state, "GET", "/analytics/performance/1").await;

        assert_eq!(response.status, 200);
        let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(json["student"]["id"], 1);

        let percentile = json["percentile"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&percentile));

        let missing = route(&state, "GET", "/analytics/performance/99").await;
        assert_eq!(missing.status, 404);
    }

    #[tokio::test]
    async fn test_summarizer_failure_is_distinct_from_not_found() {
        let state = AppState::new(
            Arc::new(RecordStore::new(generate_students(3))),
            Arc::new(FailingSummarizer),
            100,
            250,
        );

        let summary = route(&state, "GET", "/analytics/summary").await;
        assert_eq!(summary.status, 503);
        assert!(summary.body.contains("Summarization unavailable"));

        // Unknown id still reports 404, not a summarizer failure.
        let missing = route(&state, "GET", "/analytics/performance/99").await;
        assert_eq!(missing.status, 404);
        assert!(missing.body.contains("Student not found"));
    }

    #[tokio::test]
    async fn test_unknown_path_and_method() {
        let state = test_state(2);

        let unknown = route(&state, "GET", "/nope").await;
        assert_eq!(unknown.status, 404);

        let post = route(&state, "POST", "/students").await;
        assert_eq!(post.status, 405);
    }

    #[tokio::test]
    async fn test_empty_store_summary_is_degenerate() {
        let state = AppState::new(
            Arc::new(RecordStore::new(Vec::new())),
            Arc::new(DisabledSummarizer),
            100,
            250,
        );

        let response = route(&state, "GET", "/analytics/summary").await;
        assert_eq!(response.status, 200);

        let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(json["statistics"]["total_students"], 0);
        assert_eq!(json["statistics"]["average_grade"], 0.0);
        assert_eq!(json["statistics"]["grade_distribution"]["90-100"], 0);
    }

    #[test]
    fn test_response_encoding() {
        let response = HttpResponse::error(404, "Student not found");
        let encoded = String::from_utf8(response.encode()).unwrap();

        assert!(encoded.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(encoded.contains("Content-Type: application/json"));
        assert!(encoded.ends_with("{\"detail\":\"Student not found\"}"));
    }
}
