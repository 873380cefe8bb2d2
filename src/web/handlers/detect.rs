// POST /api/detect and POST /api/batch-detect.
//
// Bodies are read as untyped JSON so a missing or mistyped field produces a
// 400 with a readable message instead of an extractor rejection.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::detection::result::{is_scorable, is_toxic_score};
use crate::detection::{HeuristicScorer, Severity};
use crate::web::{api_error, AppState};

/// One classification, in the wire shape RemoteClassifier expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub is_cyberbullying: bool,
    pub score: f64,
    pub severity: Severity,
    pub categories: Vec<String>,
    pub warning: String,
    pub details: AssessmentDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDetails {
    pub toxic_words: Vec<String>,
    pub text_length: usize,
    pub word_count: usize,
}

/// Score one text with the heuristic and shape the response.
pub fn assess(scorer: &HeuristicScorer, text: &str) -> Assessment {
    let text_length = text.chars().count();
    let word_count = text.split_whitespace().count();

    if !is_scorable(text) {
        return Assessment {
            is_cyberbullying: false,
            score: 0.0,
            severity: Severity::None,
            categories: Vec::new(),
            warning: String::new(),
            details: AssessmentDetails {
                toxic_words: Vec::new(),
                text_length,
                word_count,
            },
        };
    }

    let heuristic = scorer.score(text);
    let score = (heuristic.score * 1000.0).round() / 1000.0;
    let severity = Severity::from_score(score);
    let is_cyberbullying = is_toxic_score(score);

    let toxic_words = scorer
        .lexicon()
        .terms()
        .iter()
        .filter(|t| heuristic.categories.contains(&t.term))
        .map(|t| t.term.clone())
        .collect();

    Assessment {
        is_cyberbullying,
        score,
        severity,
        categories: heuristic.categories.into_iter().collect(),
        warning: if is_cyberbullying {
            severity_warning(severity).to_string()
        } else {
            String::new()
        },
        details: AssessmentDetails {
            toxic_words,
            text_length,
            word_count,
        },
    }
}

fn severity_warning(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "CRITICAL: Extreme cyberbullying detected - Immediate action required",
        Severity::High => "HIGH: Severe cyberbullying detected - Content must be reviewed",
        Severity::Medium => "MEDIUM: Cyberbullying detected - Please revise your content",
        Severity::Low | Severity::None => {
            "LOW: Potential cyberbullying - Consider being more respectful"
        }
    }
}

/// POST /api/detect: classify `{"text": "..."}`.
pub async fn detect(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let text = body
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();

    if text.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "No text provided");
    }

    Json(assess(&state.scorer, text)).into_response()
}

/// POST /api/batch-detect: classify `{"texts": ["...", ...]}` in order.
/// Non-string entries are scored as empty text.
pub async fn batch_detect(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let Some(texts) = body.get("texts").and_then(Value::as_array) else {
        return api_error(StatusCode::BAD_REQUEST, "No texts array provided");
    };

    let results: Vec<Assessment> = texts
        .iter()
        .map(|t| assess(&state.scorer, t.as_str().unwrap_or_default().trim()))
        .collect();

    Json(serde_json::json!({
        "success": true,
        "count": results.len(),
        "results": results,
    }))
    .into_response()
}
