// Canonical detection output shared by the remote and fallback paths.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Scores strictly above this value are toxic. Both detection paths and the
/// gate read this one constant.
pub const TOXICITY_THRESHOLD: f64 = 0.5;

/// Inputs whose trimmed length is below this are never classified.
pub const MIN_TEXT_CHARS: usize = 3;

/// Warning attached to toxic fallback results.
pub const FALLBACK_WARNING: &str = "Potential harmful content detected";

/// Whether a score crosses the toxicity threshold.
pub fn is_toxic_score(score: f64) -> bool {
    score > TOXICITY_THRESHOLD
}

/// Whether the text is long enough to be worth classifying.
pub fn is_scorable(text: &str) -> bool {
    text.trim().chars().count() >= MIN_TEXT_CHARS
}

/// Which path produced a detection result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionSource {
    Remote,
    Fallback,
}

impl DetectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionSource::Remote => "remote",
            DetectionSource::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The result of screening one piece of text.
///
/// Built fresh for every detection call and never mutated afterwards.
/// `is_toxic` always equals `score > TOXICITY_THRESHOLD`, and `warning` is
/// empty whenever the text is not toxic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub score: f64,
    pub is_toxic: bool,
    pub categories: BTreeSet<String>,
    pub warning: String,
    pub source: DetectionSource,
}

impl DetectionResult {
    /// Assemble a result, enforcing the score range and the threshold rule.
    ///
    /// Non-toxic results never carry a warning. A toxic result keeps whatever
    /// warning it was given, empty included.
    pub fn new(
        score: f64,
        categories: BTreeSet<String>,
        warning: String,
        source: DetectionSource,
    ) -> Self {
        let score = clamp_score(score);
        let is_toxic = is_toxic_score(score);
        let warning = if is_toxic { warning } else { String::new() };
        Self {
            score,
            is_toxic,
            categories,
            warning,
            source,
        }
    }

    /// The zero result returned for text too short to classify.
    pub fn too_short() -> Self {
        Self {
            score: 0.0,
            is_toxic: false,
            categories: BTreeSet::new(),
            warning: String::new(),
            source: DetectionSource::Fallback,
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::from_score(self.score)
    }

    /// Categories joined for display, e.g. "hate, stupid".
    pub fn categories_summary(&self) -> String {
        self.categories
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Clamp a raw score into [0, 1]. NaN collapses to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Severity bands over the toxicity score, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Determine the band from a score (0-1). Every bound is exclusive.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s > 0.8 => Severity::Critical,
            s if s > 0.6 => Severity::High,
            s if s > 0.4 => Severity::Medium,
            s if s > 0.2 => Severity::Low,
            _ => Severity::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
