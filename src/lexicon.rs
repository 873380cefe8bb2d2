// Lexicon and pattern store: the static word lists behind the heuristic scorer.
//
// Terms and phrases are plain lower-case substrings. The store is built once
// at startup and shared read-only (via Arc) by every scorer instance, so any
// number of concurrent detections can read it without locking.

use anyhow::Result;

/// Weight contributed by each default toxic term.
pub const DEFAULT_TERM_WEIGHT: f64 = 0.2;

/// Fixed weight contributed by every matched hate phrase.
pub const PHRASE_WEIGHT: f64 = 0.5;

/// Category tag attached to the default hate phrases.
pub const HATE_SPEECH: &str = "hate_speech";

const DEFAULT_TERMS: [&str; 15] = [
    "hate",
    "stupid",
    "ugly",
    "kill",
    "die",
    "worthless",
    "dumb",
    "idiot",
    "retard",
    "fat",
    "skinny",
    "nobody",
    "failure",
    "useless",
    "suck",
];

// "kill yourself" is intentionally not listed: only these exact phrases
// earn the phrase bonus.
const DEFAULT_PHRASES: [&str; 4] = ["i hate", "you suck", "go die", "no one likes you"];

/// A single flagged lexical unit. Its `term` doubles as its category tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ToxicTerm {
    pub term: String,
    /// Contribution to the running score, in (0, 1].
    pub weight: f64,
}

/// A multi-word pattern that carries a higher fixed weight and a category tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ToxicPhrase {
    pub pattern: String,
    pub weight: f64,
    pub category: String,
}

impl ToxicTerm {
    pub fn new(term: &str, weight: f64) -> Self {
        Self {
            term: term.to_lowercase(),
            weight,
        }
    }
}

impl ToxicPhrase {
    /// Create a phrase with the standard phrase weight.
    pub fn new(pattern: &str, category: &str) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
            weight: PHRASE_WEIGHT,
            category: category.to_string(),
        }
    }
}

/// The full set of terms and phrases the heuristic scorer matches against.
#[derive(Debug, Clone)]
pub struct Lexicon {
    terms: Vec<ToxicTerm>,
    phrases: Vec<ToxicPhrase>,
}

impl Lexicon {
    /// Build a lexicon from custom terms and phrases.
    ///
    /// Every weight must lie in (0, 1] and every pattern must be non-empty
    /// (an empty pattern would match all text).
    pub fn new(terms: Vec<ToxicTerm>, phrases: Vec<ToxicPhrase>) -> Result<Self> {
        for term in &terms {
            if term.term.trim().is_empty() {
                anyhow::bail!("Toxic term must not be empty");
            }
            check_weight(&term.term, term.weight)?;
        }
        for phrase in &phrases {
            if phrase.pattern.trim().is_empty() {
                anyhow::bail!("Toxic phrase must not be empty");
            }
            if phrase.category.is_empty() {
                anyhow::bail!("Toxic phrase '{}' has no category", phrase.pattern);
            }
            check_weight(&phrase.pattern, phrase.weight)?;
        }
        Ok(Self { terms, phrases })
    }

    pub fn terms(&self) -> &[ToxicTerm] {
        &self.terms
    }

    pub fn phrases(&self) -> &[ToxicPhrase] {
        &self.phrases
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            terms: DEFAULT_TERMS
                .iter()
                .map(|t| ToxicTerm::new(t, DEFAULT_TERM_WEIGHT))
                .collect(),
            phrases: DEFAULT_PHRASES
                .iter()
                .map(|p| ToxicPhrase::new(p, HATE_SPEECH))
                .collect(),
        }
    }
}

fn check_weight(pattern: &str, weight: f64) -> Result<()> {
    if !(weight > 0.0 && weight <= 1.0) {
        anyhow::bail!("Weight for '{pattern}' must be in (0, 1], got {weight}");
    }
    Ok(())
}
