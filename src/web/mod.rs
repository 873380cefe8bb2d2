// Reference classifier service: Axum implementation of the remote contract.
//
// Serves /api/detect, /api/batch-detect and /api/health backed by the local
// heuristic scorer with jitter disabled, so the same input always gets the
// same answer. Useful for local development and as a drop-in endpoint for
// RemoteClassifier when no model-backed service is deployed.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::detection::HeuristicScorer;
use crate::lexicon::Lexicon;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub scorer: HeuristicScorer,
}

impl AppState {
    /// State over the given lexicon, jitter disabled.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            scorer: HeuristicScorer::deterministic(lexicon),
        }
    }
}

/// Start the Axum server and block until it exits.
pub async fn run_server(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Reference classifier listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::get_health))
        .route("/api/detect", post(handlers::detect::detect))
        .route("/api/batch-detect", post(handlers::detect::batch_detect))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::new(Arc::new(Lexicon::default())))
    }

    async fn post_json(path: &str, body: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_detect_toxic() {
        let (status, json) = post_json("/api/detect", r#"{"text": "you suck"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["isCyberbullying"], true);
        assert_eq!(json["severity"], "high");
        let words = json["details"]["toxicWords"].as_array().unwrap();
        assert!(words.iter().any(|w| w == "suck"));
    }

    #[tokio::test]
    async fn test_detect_missing_text_is_bad_request() {
        let (status, json) = post_json("/api/detect", r#"{"caption": "hello"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No text provided");
    }

    #[tokio::test]
    async fn test_detect_short_text_scores_zero() {
        let (status, json) = post_json("/api/detect", r#"{"text": "hi"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["score"], 0.0);
        assert_eq!(json["isCyberbullying"], false);
    }

    #[tokio::test]
    async fn test_batch_detect() {
        let (status, json) = post_json(
            "/api/batch-detect",
            r#"{"texts": ["go die", "Sunny afternoon at the park"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 2);
        assert_eq!(json["results"][0]["isCyberbullying"], true);
        assert_eq!(json["results"][1]["isCyberbullying"], false);
    }

    #[tokio::test]
    async fn test_batch_without_array_is_bad_request() {
        let (status, _) = post_json("/api/batch-detect", r#"{"texts": "nope"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
