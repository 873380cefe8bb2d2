// Composition tests: detection output flowing into the publication gate.
//
// Exercises the full caller path (detect -> gate -> confirm) with the remote
// classifier offline and jitter disabled, so every verdict is deterministic.

use std::sync::Arc;

use shortsafe::config::Config;
use shortsafe::detection::{DetectionSource, Detector, HeuristicScorer, OfflineClassifier};
use shortsafe::gate::{decide, GateState, PublicationGate};
use shortsafe::lexicon::Lexicon;

fn offline_detector() -> Detector {
    Detector::new(
        Arc::new(OfflineClassifier),
        HeuristicScorer::deterministic(Arc::new(Lexicon::default())),
    )
}

// ============================================================
// Detect -> Gate
// ============================================================

#[tokio::test]
async fn toxic_title_needs_confirmation_then_publishes_with_override() {
    let result = offline_detector()
        .detect("I hate you, you are so stupid")
        .await;
    assert!(result.is_toxic);

    let mut gate = PublicationGate::new(result);
    let pending = gate.submit();
    assert!(!pending.allowed);
    assert!(pending.requires_confirmation);
    assert!(pending.message.contains("0.90"));
    assert!(pending.message.contains("stupid"));

    let published = gate.confirm(true);
    assert!(published.allowed);
    assert_eq!(published.state, GateState::AllowedWithOverride);
}

#[tokio::test]
async fn toxic_title_without_answer_is_blocked() {
    let result = offline_detector().detect("you suck, go die").await;
    let mut gate = PublicationGate::new(result);
    gate.submit();
    let decision = gate.dismiss();
    assert!(!decision.allowed);
    assert_eq!(decision.state, GateState::Blocked);
}

#[tokio::test]
async fn publish_without_override_blocks_toxic_title() {
    let result = offline_detector().detect("you suck").await;
    let decision = decide(&result, Some(false));
    assert!(!decision.allowed);
    assert!(!decision.requires_confirmation);
    assert_eq!(decision.state, GateState::Blocked);

    let decision = decide(&result, Some(true));
    assert!(decision.allowed);
    assert_eq!(decision.state, GateState::AllowedWithOverride);
}

#[tokio::test]
async fn publish_without_override_allows_benign_title() {
    let result = offline_detector().detect("Morning run by the river").await;
    let decision = decide(&result, Some(false));
    assert!(decision.allowed);
    assert_eq!(decision.state, GateState::Allowed);
}

#[tokio::test]
async fn benign_title_publishes_immediately() {
    let result = offline_detector()
        .detect("Beautiful sunset at the beach")
        .await;
    let decision = decide(&result, None);
    assert!(decision.allowed);
    assert!(!decision.requires_confirmation);
    assert_eq!(decision.state, GateState::Allowed);
}

#[tokio::test]
async fn too_short_title_publishes_immediately() {
    let result = offline_detector().detect("ok").await;
    assert_eq!(result.source, DetectionSource::Fallback);
    assert!(decide(&result, None).allowed);
}

#[tokio::test]
async fn editing_text_means_a_fresh_detection_and_gate() {
    let detector = offline_detector();

    let first = detector.detect("you are so stupid and ugly").await;
    let mut gate = PublicationGate::new(first);
    // 0.4 from two terms is below the threshold
    assert_eq!(gate.submit().state, GateState::Allowed);

    let edited = detector.detect("you suck and you are stupid").await;
    let mut gate = PublicationGate::new(edited);
    assert_eq!(gate.submit().state, GateState::PendingConfirmation);
}

// ============================================================
// Config -> Detector
// ============================================================

#[tokio::test]
async fn config_with_remote_disabled_still_detects() {
    let config = Config::from_lookup(|key| match key {
        "SHORTSAFE_CLASSIFIER_URL" => Some("off".to_string()),
        "SHORTSAFE_JITTER" => Some("off".to_string()),
        _ => None,
    })
    .unwrap();

    let detector = config.detector(Arc::new(Lexicon::default())).unwrap();
    let result = detector.detect("no one likes you").await;
    assert_eq!(result.source, DetectionSource::Fallback);
    assert_eq!(result.score, 0.5);
    assert!(!result.is_toxic);
}
