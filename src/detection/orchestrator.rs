// Detection orchestrator: remote classifier first, heuristic scorer when it fails.
//
// detect() is total: every call returns a DetectionResult. Short input is
// answered locally without classification. Otherwise one remote attempt is
// made under a hard timeout; any failure (including the timeout) drops
// straight to the heuristic scorer. There are no retries.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::ClassifierUnavailable;
use super::heuristic::HeuristicScorer;
use super::remote::DEFAULT_TIMEOUT;
use super::result::{is_scorable, DetectionResult, DetectionSource, FALLBACK_WARNING};
use super::traits::Classifier;
use crate::output::truncate_chars;

/// Category reported by the fallback path whenever the heuristic matched.
pub const FALLBACK_CATEGORY: &str = "toxic";

/// Runs remote classification with a local fallback.
pub struct Detector {
    classifier: Arc<dyn Classifier>,
    scorer: HeuristicScorer,
    timeout: Duration,
}

impl Detector {
    pub fn new(classifier: Arc<dyn Classifier>, scorer: HeuristicScorer) -> Self {
        Self {
            classifier,
            scorer,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the hard per-call deadline on the remote path.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn scorer(&self) -> &HeuristicScorer {
        &self.scorer
    }

    /// Screen one piece of text. Always returns a result.
    pub async fn detect(&self, text: &str) -> DetectionResult {
        if !is_scorable(text) {
            debug!("Text too short to classify");
            return DetectionResult::too_short();
        }

        let outcome = match tokio::time::timeout(self.timeout, self.classifier.classify(text)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(ClassifierUnavailable::Timeout),
        };

        match outcome {
            Ok(result) => remote_result(result),
            Err(e) => {
                warn!(
                    error = %e,
                    text_preview = %truncate_chars(text, 50),
                    "Remote classifier unavailable, using heuristic fallback"
                );
                self.fallback(text)
            }
        }
    }

    /// Screen several texts, preserving input order.
    ///
    /// Short texts are answered locally. The rest go to the classifier in a
    /// single batch; if that call fails or returns the wrong number of
    /// results, each of those texts is scored by the heuristic instead.
    pub async fn detect_batch(&self, texts: &[String]) -> Vec<DetectionResult> {
        let mut results: Vec<Option<DetectionResult>> = texts
            .iter()
            .map(|t| (!is_scorable(t)).then(DetectionResult::too_short))
            .collect();

        let pending: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_none())
            .map(|(i, _)| i)
            .collect();

        if !pending.is_empty() {
            let batch: Vec<String> = pending.iter().map(|&i| texts[i].clone()).collect();
            let outcome =
                match tokio::time::timeout(self.timeout, self.classifier.classify_batch(&batch))
                    .await
                {
                    Ok(outcome) => outcome.and_then(|r| {
                        if r.len() == batch.len() {
                            Ok(r)
                        } else {
                            Err(ClassifierUnavailable::BatchMismatch {
                                expected: batch.len(),
                                got: r.len(),
                            })
                        }
                    }),
                    Err(_) => Err(ClassifierUnavailable::Timeout),
                };

            match outcome {
                Ok(remote) => {
                    for (&i, result) in pending.iter().zip(remote) {
                        results[i] = Some(remote_result(result));
                    }
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        count = pending.len(),
                        "Batch classification unavailable, scoring each text locally"
                    );
                    for &i in &pending {
                        results[i] = Some(self.fallback(&texts[i]));
                    }
                }
            }
        }

        results
            .into_iter()
            .map(|r| r.unwrap_or_else(DetectionResult::too_short))
            .collect()
    }

    /// Heuristic path. Matched tags are kept alongside the generic "toxic"
    /// category so callers can see what triggered the flag.
    fn fallback(&self, text: &str) -> DetectionResult {
        let heuristic = self.scorer.score(text);
        let mut categories = BTreeSet::new();
        if heuristic.matched() {
            categories.insert(FALLBACK_CATEGORY.to_string());
            categories.extend(heuristic.categories);
        }
        DetectionResult::new(
            heuristic.score,
            categories,
            FALLBACK_WARNING.to_string(),
            DetectionSource::Fallback,
        )
    }
}

/// Re-apply the score range and threshold to whatever a classifier returned.
fn remote_result(result: DetectionResult) -> DetectionResult {
    DetectionResult::new(
        result.score,
        result.categories,
        result.warning,
        DetectionSource::Remote,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::traits::OfflineClassifier;
    use crate::lexicon::Lexicon;

    fn offline_detector() -> Detector {
        Detector::new(
            Arc::new(OfflineClassifier),
            HeuristicScorer::deterministic(Arc::new(Lexicon::default())),
        )
    }

    #[tokio::test]
    async fn test_short_text_short_circuits() {
        let result = offline_detector().detect(" a ").await;
        assert_eq!(result, DetectionResult::too_short());
    }

    #[tokio::test]
    async fn test_fallback_benign_has_no_categories() {
        let result = offline_detector().detect("Beautiful sunset at the beach").await;
        assert_eq!(result.source, DetectionSource::Fallback);
        assert!(result.categories.is_empty());
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn test_fallback_toxic_has_standard_warning() {
        let result = offline_detector().detect("go die").await;
        assert!(result.is_toxic);
        assert_eq!(result.warning, FALLBACK_WARNING);
        assert!(result.categories.contains(FALLBACK_CATEGORY));
        assert!(result.categories.contains("hate_speech"));
    }

    #[tokio::test]
    async fn test_fallback_low_score_match_keeps_categories_without_warning() {
        let result = offline_detector().detect("such a failure").await;
        assert!(!result.is_toxic);
        assert!(result.warning.is_empty());
        assert!(result.categories.contains("failure"));
    }

    #[tokio::test]
    async fn test_batch_preserves_order_with_short_items() {
        let texts = vec![
            "ok".to_string(),
            "you suck".to_string(),
            "Lovely weather".to_string(),
        ];
        let results = offline_detector().detect_batch(&texts).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], DetectionResult::too_short());
        assert!(results[1].is_toxic);
        assert!(!results[2].is_toxic);
    }
}
