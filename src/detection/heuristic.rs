// Local heuristic scorer: substring matching against the lexicon.
//
// This is both the offline fallback for the remote classifier and the
// live-typing quick check. It is intentionally simple: lower-case the text,
// look for every term and phrase as a raw substring, sum their weights, add
// jitter, clamp. No tokenization, stemming or negation handling, so
// "skinny jeans" scores like an insult. That precision limit is accepted.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::noise::{NoNoise, NoiseSource};
use super::result::{is_scorable, DetectionResult, DetectionSource};
use crate::lexicon::Lexicon;
use crate::output::truncate_chars;

/// Raw heuristic output before it is turned into a DetectionResult.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicScore {
    /// Clamped to [0, 1], jitter included.
    pub score: f64,
    /// Matched term texts plus the category tags of matched phrases.
    pub categories: BTreeSet<String>,
}

impl HeuristicScore {
    fn empty() -> Self {
        Self {
            score: 0.0,
            categories: BTreeSet::new(),
        }
    }

    /// True when at least one term or phrase matched.
    pub fn matched(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// Scores text against a shared lexicon, with pluggable noise.
#[derive(Clone)]
pub struct HeuristicScorer {
    lexicon: Arc<Lexicon>,
    noise: Arc<dyn NoiseSource>,
}

impl HeuristicScorer {
    pub fn new(lexicon: Arc<Lexicon>, noise: Arc<dyn NoiseSource>) -> Self {
        Self { lexicon, noise }
    }

    /// Scorer with jitter disabled. Identical input always scores identically.
    pub fn deterministic(lexicon: Arc<Lexicon>) -> Self {
        Self::new(lexicon, Arc::new(NoNoise))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Score a piece of text.
    ///
    /// Empty or whitespace-only text scores exactly 0 with no categories and
    /// no jitter. Overlapping matches each add their weight; only the
    /// category labels deduplicate.
    pub fn score(&self, text: &str) -> HeuristicScore {
        if text.trim().is_empty() {
            return HeuristicScore::empty();
        }

        let lowered = text.to_lowercase();
        let mut total = 0.0;
        let mut categories = BTreeSet::new();

        for term in self.lexicon.terms() {
            if lowered.contains(term.term.as_str()) {
                total += term.weight;
                categories.insert(term.term.clone());
            }
        }

        for phrase in self.lexicon.phrases() {
            if lowered.contains(phrase.pattern.as_str()) {
                total += phrase.weight;
                categories.insert(phrase.category.clone());
            }
        }

        let raw = total;
        total += self.noise.sample();
        let score = total.clamp(0.0, 1.0);

        debug!(
            raw_score = raw,
            score = score,
            matches = categories.len(),
            text_preview = %truncate_chars(text, 50),
            "Heuristic score"
        );

        HeuristicScore { score, categories }
    }

    /// Live-typing check: the heuristic alone, shaped as a DetectionResult.
    ///
    /// Applies the same short-text rule as the orchestrator. Matched terms are
    /// reported as categories so the caller can show what triggered it.
    pub fn quick_check(&self, text: &str) -> DetectionResult {
        if !is_scorable(text) {
            return DetectionResult::too_short();
        }
        let heuristic = self.score(text);
        let warning = format!(
            "Potential cyberbullying detected (Score: {:.2})",
            heuristic.score
        );
        DetectionResult::new(
            heuristic.score,
            heuristic.categories,
            warning,
            DetectionSource::Fallback,
        )
    }
}
