// HTTP client for the remote cyberbullying classifier.
//
// Wire contract:
//   POST {base}/api/detect        {"text": "..."}
//     -> {"isCyberbullying": bool, "score": f64, "categories": [..], "warning": "..", "details": {..}}
//   POST {base}/api/batch-detect  {"texts": ["..", ..]}
//     -> {"results": [<same shape as /api/detect>, ..]}
//   GET  {base}/api/health
//
// The response is not trusted to match that shape. It is read as untyped
// JSON and every field is pulled out individually: a missing or wrongly
// typed field falls back to its zero value instead of failing the call. Only
// a non-object body (or a bad batch envelope) is treated as malformed.

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error::ClassifierUnavailable;
use super::result::{is_toxic_score, DetectionResult, DetectionSource};
use super::traits::Classifier;
use crate::output::truncate_chars;

/// Default request timeout for the remote classifier.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);

/// Client for a remote classifier service.
pub struct RemoteClassifier {
    client: Client,
    base_url: String,
}

impl RemoteClassifier {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:5000`).
    ///
    /// `timeout` bounds every request end to end, connection included.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("Classifier URL must start with http:// or https://, got '{base_url}'");
        }
        if timeout.is_zero() {
            anyhow::bail!("Classifier timeout must be greater than zero");
        }

        let client = Client::builder()
            .user_agent("shortsafe/0.1 (content-screening)")
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query the classifier's health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, ClassifierUnavailable> {
        let url = format!("{}/api/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        let body = read_success_body(response).await?;
        serde_json::from_value(body).map_err(|e| ClassifierUnavailable::Malformed(e.to_string()))
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Value, ClassifierUnavailable> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(payload).send().await?;
        read_success_body(response).await
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<DetectionResult, ClassifierUnavailable> {
        let body = self
            .post_json("/api/detect", &DetectRequest { text: text.trim() })
            .await?;
        let result = parse_detection(&body)?;

        debug!(
            score = result.score,
            is_toxic = result.is_toxic,
            categories = result.categories.len(),
            text_preview = %truncate_chars(text, 50),
            "Remote classifier scored text"
        );

        Ok(result)
    }

    async fn classify_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<DetectionResult>, ClassifierUnavailable> {
        let trimmed: Vec<&str> = texts.iter().map(|t| t.trim()).collect();
        let body = self
            .post_json("/api/batch-detect", &BatchDetectRequest { texts: &trimmed })
            .await?;
        parse_batch(&body, texts.len())
    }
}

/// Reject non-2xx responses, then read the body as JSON.
async fn read_success_body(response: reqwest::Response) -> Result<Value, ClassifierUnavailable> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClassifierUnavailable::Status {
            status: status.as_u16(),
            body: truncate_chars(&body, 200),
        });
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| ClassifierUnavailable::Malformed(e.to_string()))
}

/// Map one `/api/detect`-shaped payload into a remote DetectionResult.
///
/// The payload must be a JSON object. Each field is read independently and
/// defaults when missing or mistyped: score 0, no categories, empty warning.
/// Toxicity is decided by the shared threshold over the score; the remote
/// `isCyberbullying` flag is only logged when it disagrees.
pub fn parse_detection(payload: &Value) -> Result<DetectionResult, ClassifierUnavailable> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ClassifierUnavailable::Malformed("expected a JSON object".to_string()))?;

    let score = obj.get("score").and_then(Value::as_f64).unwrap_or(0.0);
    let categories: BTreeSet<String> = obj
        .get("categories")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let warning = obj
        .get("warning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if let Some(flag) = obj.get("isCyberbullying").and_then(Value::as_bool) {
        if flag != is_toxic_score(score) {
            debug!(
                remote_flag = flag,
                score = score,
                "Remote toxicity flag disagrees with threshold; using threshold"
            );
        }
    }

    Ok(DetectionResult::new(
        score,
        categories,
        warning,
        DetectionSource::Remote,
    ))
}

/// Map a `/api/batch-detect` payload, checking the result count.
pub fn parse_batch(
    payload: &Value,
    expected: usize,
) -> Result<Vec<DetectionResult>, ClassifierUnavailable> {
    let items = payload
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| ClassifierUnavailable::Malformed("missing results array".to_string()))?;

    if items.len() != expected {
        return Err(ClassifierUnavailable::BatchMismatch {
            expected,
            got: items.len(),
        });
    }

    items.iter().map(parse_detection).collect()
}

/// Response from `GET /api/health`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

// --- Request types ---

#[derive(Serialize)]
struct DetectRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct BatchDetectRequest<'a> {
    texts: &'a [&'a str],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_http_url() {
        assert!(RemoteClassifier::new("localhost:5000", DEFAULT_TIMEOUT).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(RemoteClassifier::new("http://localhost:5000", Duration::ZERO).is_err());
    }

    #[test]
    fn test_trims_trailing_slash() {
        let client = RemoteClassifier::new("http://localhost:5000/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_parse_full_payload() {
        let payload = json!({
            "isCyberbullying": true,
            "score": 0.83,
            "categories": ["insults", "harassment", "insults"],
            "warning": "HIGH: Severe cyberbullying detected",
            "details": {"toxicWords": ["hate"]}
        });
        let result = parse_detection(&payload).unwrap();
        assert!((result.score - 0.83).abs() < 1e-12);
        assert!(result.is_toxic);
        assert_eq!(result.categories.len(), 2);
        assert_eq!(result.warning, "HIGH: Severe cyberbullying detected");
        assert_eq!(result.source, DetectionSource::Remote);
    }

    #[test]
    fn test_parse_missing_fields_default() {
        let result = parse_detection(&json!({})).unwrap();
        assert_eq!(result.score, 0.0);
        assert!(!result.is_toxic);
        assert!(result.categories.is_empty());
        assert!(result.warning.is_empty());
    }

    #[test]
    fn test_parse_toxic_without_warning_keeps_it_empty() {
        let result = parse_detection(&json!({"isCyberbullying": true, "score": 0.9})).unwrap();
        assert!(result.is_toxic);
        assert_eq!(result.warning, "");
    }

    #[test]
    fn test_parse_wrongly_typed_fields_are_treated_as_missing() {
        let payload = json!({
            "isCyberbullying": "yes",
            "score": "0.9",
            "categories": "insults",
            "warning": 12
        });
        let result = parse_detection(&payload).unwrap();
        assert_eq!(result.score, 0.0);
        assert!(result.categories.is_empty());
        assert!(result.warning.is_empty());
    }

    #[test]
    fn test_parse_skips_non_string_categories() {
        let payload = json!({"score": 0.7, "categories": ["threats", 3, null, "spam"]});
        let result = parse_detection(&payload).unwrap();
        let cats: Vec<&str> = result.categories.iter().map(String::as_str).collect();
        assert_eq!(cats, vec!["spam", "threats"]);
    }

    #[test]
    fn test_parse_clamps_out_of_range_score() {
        let result = parse_detection(&json!({"score": 7.5})).unwrap();
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_parse_uses_threshold_over_remote_flag() {
        // Remote says toxic at 0.45; the shared threshold says no
        let result = parse_detection(&json!({"isCyberbullying": true, "score": 0.45})).unwrap();
        assert!(!result.is_toxic);
        assert!(result.warning.is_empty());
    }

    #[test]
    fn test_parse_non_object_is_malformed() {
        let err = parse_detection(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ClassifierUnavailable::Malformed(_)));
    }

    #[test]
    fn test_parse_batch_count_mismatch() {
        let payload = json!({"results": [{"score": 0.1}]});
        let err = parse_batch(&payload, 2).unwrap_err();
        assert!(matches!(
            err,
            ClassifierUnavailable::BatchMismatch { expected: 2, got: 1 }
        ));
    }

    #[test]
    fn test_parse_batch_missing_results() {
        let err = parse_batch(&json!({"success": true}), 1).unwrap_err();
        assert!(matches!(err, ClassifierUnavailable::Malformed(_)));
    }
}
