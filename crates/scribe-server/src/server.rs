//! `ScribeServer` — Axum JSON API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use scribe_core::ScribeError;
use scribe_runtime::Orchestrator;
use scribe_session::{SessionSnapshot, SessionStatus};

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The attempt orchestrator.
    pub orchestrator: Arc<Orchestrator>,
    /// When the server started.
    pub start_time: Instant,
}

/// The scribe HTTP server.
pub struct ScribeServer {
    orchestrator: Arc<Orchestrator>,
    start_time: Instant,
}

impl ScribeServer {
    /// Create a new server around an orchestrator.
    #[must_use]
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            start_time: Instant::now(),
        }
    }

    /// Build the Axum router with all routes.
    #[must_use]
    pub fn router(&self) -> Router {
        let state = AppState {
            orchestrator: self.orchestrator.clone(),
            start_time: self.start_time,
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/api/session", get(session_handler))
            .route("/api/analyze", post(analyze_handler))
            .route("/api/url", post(url_handler))
            .route("/api/reset", post(reset_handler))
            .route("/api/cancel", post(cancel_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind and serve until the process is stopped.
    pub async fn serve(self, host: &str, port: u16) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind((host, port)).await?;
        info!(addr = %listener.local_addr()?, "scribe server listening");
        axum::serve(listener, self.router()).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /api/analyze`. Either `path` (server-local file) or
/// `data` (base64 content, optionally a data URI) must be present.
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    /// Local path of the media file to analyze.
    path: Option<String>,
    /// Declared MIME type; resolved from the extension when absent.
    mime_type: Option<String>,
    /// Display name for inline submissions.
    name: Option<String>,
    /// Base64 content for inline submissions.
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UrlRequest {
    url: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
}

#[derive(Debug, Serialize)]
struct AcceptedResponse {
    accepted: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ErrorResponse {
    fn from_error(err: &ScribeError) -> Self {
        Self {
            error: ErrorDetail {
                code: err.code(),
                message: err.user_message(),
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: scribe_core::VERSION,
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /api/session
async fn session_handler(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.orchestrator.snapshot())
}

/// POST /api/analyze
///
/// Accepts the attempt and runs it in the background; progress is polled
/// from `/api/session`.
async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<AcceptedResponse>), (StatusCode, Json<ErrorResponse>)> {
    if is_busy(&state.orchestrator.snapshot()) {
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse::from_error(&ScribeError::Busy)),
        ));
    }

    let orchestrator = state.orchestrator.clone();
    if let Some(path) = request.path {
        let path = PathBuf::from(path);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let err = ScribeError::Read {
                message: format!("no such file: {}", path.display()),
            };
            return Err((StatusCode::NOT_FOUND, Json(ErrorResponse::from_error(&err))));
        }
        drop(tokio::spawn(async move {
            let _ = orchestrator
                .analyze_file(&path, request.mime_type.as_deref())
                .await;
        }));
    } else if let Some(data) = request.data {
        let name = request.name.unwrap_or_else(|| "media".to_string());
        let mime_type = request
            .mime_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        drop(tokio::spawn(async move {
            let _ = orchestrator.analyze_data(&name, &mime_type, &data).await;
        }));
    } else {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: ErrorDetail {
                    code: "INVALID_REQUEST",
                    message: "either path or data must be provided".to_string(),
                },
            }),
        ));
    }

    Ok((StatusCode::ACCEPTED, Json(AcceptedResponse { accepted: true })))
}

/// POST /api/url
///
/// URL ingestion is a rejecting stub; the session records the failure and
/// the caller gets the restriction message.
async fn url_handler(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> (StatusCode, Json<ErrorResponse>) {
    let err = match state.orchestrator.analyze_url(&request.url).await {
        Ok(()) => ScribeError::Restricted,
        Err(err) => err,
    };
    let status = match err {
        ScribeError::Busy => StatusCode::CONFLICT,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(ErrorResponse::from_error(&err)))
}

/// POST /api/reset
async fn reset_handler(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.orchestrator.reset().await;
    Json(state.orchestrator.snapshot())
}

/// POST /api/cancel
async fn cancel_handler(State(state): State<AppState>) -> StatusCode {
    state.orchestrator.cancel().await;
    StatusCode::OK
}

fn is_busy(snapshot: &SessionSnapshot) -> bool {
    matches!(
        snapshot.status,
        SessionStatus::Uploading | SessionStatus::Transcribing | SessionStatus::Summarizing
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use scribe_core::{AnalysisResult, MediaPayload};
    use scribe_llm::{AnalysisClient, ClientError};
    use scribe_runtime::{OrchestratorConfig, PacingConfig};
    use std::io::Write;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    struct StubClient {
        hang: bool,
    }

    #[async_trait]
    impl AnalysisClient for StubClient {
        async fn analyze(
            &self,
            _payload: &MediaPayload,
            cancel: &CancellationToken,
        ) -> Result<AnalysisResult, ClientError> {
            if self.hang {
                cancel.cancelled().await;
                return Err(ClientError::Cancelled);
            }
            Ok(AnalysisResult {
                transcript: "Hello world".into(),
                summary: "A greeting.".into(),
                key_points: vec!["greeting".into()],
                action_items: vec![],
                sentiment: "Neutral".into(),
            })
        }
    }

    fn make_server(hang: bool) -> (ScribeServer, Arc<Orchestrator>) {
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(StubClient { hang }),
            OrchestratorConfig {
                max_media_bytes: 1024 * 1024,
                pacing: PacingConfig::immediate(),
            },
        ));
        (ScribeServer::new(orchestrator.clone()), orchestrator)
    }

    fn media_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"clip").unwrap();
        file.flush().unwrap();
        file
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (server, _) = make_server(false);
        let response = server
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn session_starts_idle() {
        let (server, _) = make_server(false);
        let response = server
            .router()
            .oneshot(Request::get("/api/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "idle");
        assert_eq!(json["phases"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn analyze_missing_path_is_404() {
        let (server, _) = make_server(false);
        let response = server
            .router()
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({"path": "/nonexistent/clip.mp3"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "READ_ERROR");
    }

    #[tokio::test]
    async fn analyze_accepts_and_completes() {
        let (server, orchestrator) = make_server(false);
        let file = media_file();

        let response = server
            .router()
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({"path": file.path().to_str().unwrap()}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let mut rx = orchestrator.subscribe();
        let snapshot = rx
            .wait_for(|s| s.status == SessionStatus::Completed)
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.result.unwrap().transcript, "Hello world");
    }

    #[tokio::test]
    async fn analyze_accepts_inline_data() {
        let (server, orchestrator) = make_server(false);

        let response = server
            .router()
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({
                    "name": "clip.mp3",
                    "mime_type": "audio/mpeg",
                    "data": "aGVsbG8gd29ybGQ="
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let mut rx = orchestrator.subscribe();
        let snapshot = rx
            .wait_for(|s| s.status == SessionStatus::Completed)
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.file.unwrap().name, "clip.mp3");
    }

    #[tokio::test]
    async fn analyze_without_path_or_data_is_422() {
        let (server, _) = make_server(false);
        let response = server
            .router()
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({"mime_type": "audio/mpeg"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn analyze_while_busy_is_409() {
        let (server, orchestrator) = make_server(true);
        let file = media_file();
        let router = server.router();

        let response = router
            .clone()
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({"path": file.path().to_str().unwrap()}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let mut rx = orchestrator.subscribe();
        rx.wait_for(|s| s.status != SessionStatus::Idle).await.unwrap();

        let response = router
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({"path": file.path().to_str().unwrap()}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BUSY");

        orchestrator.cancel().await;
    }

    #[tokio::test]
    async fn url_submission_is_422_with_restriction_message() {
        let (server, orchestrator) = make_server(false);
        let response = server
            .router()
            .oneshot(post_json(
                "/api/url",
                serde_json::json!({"url": "https://example.com/a.mp4"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "RESTRICTED_FEATURE");
        assert_eq!(
            json["error"]["message"],
            "URL processing is currently restricted. Please upload a local file."
        );
        assert_eq!(orchestrator.snapshot().status, SessionStatus::Error);
    }

    #[tokio::test]
    async fn reset_returns_idle_snapshot() {
        let (server, orchestrator) = make_server(false);
        let _ = orchestrator.analyze_url("https://example.com").await;
        assert_eq!(orchestrator.snapshot().status, SessionStatus::Error);

        let response = server
            .router()
            .oneshot(post_json("/api/reset", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "idle");
    }

    #[tokio::test]
    async fn cancel_fails_the_running_attempt() {
        let (server, orchestrator) = make_server(true);
        let file = media_file();
        let router = server.router();

        let response = router
            .clone()
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({"path": file.path().to_str().unwrap()}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let mut rx = orchestrator.subscribe();
        rx.wait_for(|s| s.status != SessionStatus::Idle).await.unwrap();

        let response = router
            .oneshot(post_json("/api/cancel", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let snapshot = rx
            .wait_for(|s| s.status == SessionStatus::Error)
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.error.as_deref(), Some("Analysis cancelled."));
    }
}
