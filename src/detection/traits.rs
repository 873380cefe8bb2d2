// Classifier trait: the seam between the orchestrator and a scoring backend.
//
// The remote HTTP client is the production implementation. Tests plug in
// their own implementations to simulate outages, slow endpoints and odd
// payloads without a network.

use async_trait::async_trait;

use super::error::ClassifierUnavailable;
use super::result::DetectionResult;

/// A backend that can classify text. Implementations are async because the
/// real backend is an HTTP service.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a single text.
    async fn classify(&self, text: &str) -> Result<DetectionResult, ClassifierUnavailable>;

    /// Classify several texts, returning results in input order.
    /// Default implementation calls classify sequentially and fails on the
    /// first error; backends with a batch endpoint should override it.
    async fn classify_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<DetectionResult>, ClassifierUnavailable> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.classify(text).await?);
        }
        Ok(results)
    }
}

/// Classifier used when no remote endpoint is configured. Every call fails
/// with `NotConfigured`, which sends the orchestrator straight to the
/// heuristic path.
pub struct OfflineClassifier;

#[async_trait]
impl Classifier for OfflineClassifier {
    async fn classify(&self, _text: &str) -> Result<DetectionResult, ClassifierUnavailable> {
        Err(ClassifierUnavailable::NotConfigured)
    }
}
