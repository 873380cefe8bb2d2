// Publication gate: turns one DetectionResult into a publish decision.
//
// State machine for a single submission attempt:
//
//   Idle --submit--> Allowed                       (not toxic)
//   Idle --submit--> PendingConfirmation           (toxic)
//   PendingConfirmation --confirm(true)---> AllowedWithOverride
//   PendingConfirmation --confirm(false)--> Blocked
//   PendingConfirmation --dismiss---------> Blocked
//
// The gate never re-runs detection. If the caller edits the text, they
// detect again and build a new gate.

use serde::Serialize;
use tracing::info;

use crate::detection::DetectionResult;

/// Where a submission currently sits in the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateState {
    Idle,
    Allowed,
    PendingConfirmation,
    AllowedWithOverride,
    Blocked,
}

impl GateState {
    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GateState::Allowed | GateState::AllowedWithOverride | GateState::Blocked
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::Idle => "Idle",
            GateState::Allowed => "Allowed",
            GateState::PendingConfirmation => "PendingConfirmation",
            GateState::AllowedWithOverride => "AllowedWithOverride",
            GateState::Blocked => "Blocked",
        }
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the caller should do with the submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateDecision {
    pub allowed: bool,
    pub requires_confirmation: bool,
    pub message: String,
    pub state: GateState,
}

/// Gate over a single submission attempt.
#[derive(Debug, Clone)]
pub struct PublicationGate {
    result: DetectionResult,
    state: GateState,
}

impl PublicationGate {
    pub fn new(result: DetectionResult) -> Self {
        Self {
            result,
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn result(&self) -> &DetectionResult {
        &self.result
    }

    /// Present the submission. From Idle this moves to Allowed or
    /// PendingConfirmation; in any other state it reports the current
    /// decision unchanged.
    pub fn submit(&mut self) -> GateDecision {
        if self.state == GateState::Idle {
            self.state = if self.result.is_toxic {
                GateState::PendingConfirmation
            } else {
                GateState::Allowed
            };
        }
        self.decision()
    }

    /// Answer a pending confirmation. `proceed = true` overrides the warning.
    ///
    /// An Idle gate is submitted first, so a caller that already knows its
    /// answer can call this directly. Terminal states do not change.
    pub fn confirm(&mut self, proceed: bool) -> GateDecision {
        if self.state == GateState::Idle {
            self.submit();
        }
        if self.state == GateState::PendingConfirmation {
            self.state = if proceed {
                info!(
                    score = self.result.score,
                    categories = %self.result.categories_summary(),
                    "Publication allowed with override"
                );
                GateState::AllowedWithOverride
            } else {
                GateState::Blocked
            };
        }
        self.decision()
    }

    /// The confirmation went unanswered. Same outcome as declining.
    pub fn dismiss(&mut self) -> GateDecision {
        self.confirm(false)
    }

    /// The decision for the current state.
    pub fn decision(&self) -> GateDecision {
        let (allowed, requires_confirmation, message) = match self.state {
            GateState::Idle => (false, false, String::new()),
            GateState::Allowed => (true, false, String::new()),
            GateState::PendingConfirmation => (false, true, self.warning_message()),
            GateState::AllowedWithOverride => (
                true,
                false,
                format!(
                    "Published despite a cyberbullying warning (score {:.2})",
                    self.result.score
                ),
            ),
            GateState::Blocked => (
                false,
                false,
                format!(
                    "Publication blocked: potentially harmful content (score {:.2})",
                    self.result.score
                ),
            ),
        };
        GateDecision {
            allowed,
            requires_confirmation,
            message,
            state: self.state,
        }
    }

    fn warning_message(&self) -> String {
        let categories = if self.result.categories.is_empty() {
            "unspecified".to_string()
        } else {
            self.result.categories_summary()
        };
        format!(
            "Cyberbullying detected. Score: {:.2}. Categories: {}. \
             This content may be harmful to others. Confirm to publish anyway.",
            self.result.score, categories
        )
    }
}

/// One-shot gate evaluation.
///
/// `None` means the caller has not been asked yet: a toxic result comes back
/// pending. `Some(true)` publishes with override; `Some(false)` blocks.
pub fn decide(result: &DetectionResult, override_flag: Option<bool>) -> GateDecision {
    let mut gate = PublicationGate::new(result.clone());
    let first = gate.submit();
    match override_flag {
        None => first,
        Some(proceed) => gate.confirm(proceed),
    }
}
