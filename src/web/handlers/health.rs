// GET /api/health: liveness plus a description of the service.
//
// Shape matches detection::remote::HealthStatus so RemoteClassifier::health
// can read it back.

use axum::response::IntoResponse;
use axum::Json;

pub async fn get_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "model": "Heuristic lexicon scorer",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/api/detect", "/api/batch-detect", "/api/health"],
    }))
}
