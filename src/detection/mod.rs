// Toxicity detection: remote classifier with a local heuristic fallback.
//
// The Classifier trait abstracts the scoring backend. RemoteClassifier talks
// to the HTTP service; Detector wraps any Classifier and guarantees a result
// by falling back to HeuristicScorer whenever the backend is unavailable.

pub mod error;
pub mod heuristic;
pub mod noise;
pub mod orchestrator;
pub mod remote;
pub mod result;
pub mod traits;

pub use error::ClassifierUnavailable;
pub use heuristic::{HeuristicScore, HeuristicScorer};
pub use orchestrator::Detector;
pub use remote::RemoteClassifier;
pub use result::{DetectionResult, DetectionSource, Severity, TOXICITY_THRESHOLD};
pub use traits::{Classifier, OfflineClassifier};
