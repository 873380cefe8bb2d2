use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::detection::noise::{NoNoise, NoiseSource, UniformJitter};
use crate::detection::remote::DEFAULT_TIMEOUT;
use crate::detection::{Classifier, Detector, HeuristicScorer, OfflineClassifier, RemoteClassifier};
use crate::lexicon::Lexicon;

/// Default remote classifier location.
pub const DEFAULT_CLASSIFIER_URL: &str = "http://localhost:5000";

/// Central configuration loaded from environment variables.
///
/// The binary loads a .env file first via dotenvy, so anything here can
/// also come from that file.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote classifier base URL. None disables the remote path entirely.
    pub classifier_url: Option<String>,
    /// Hard timeout for each remote call.
    pub classifier_timeout: Duration,
    /// Whether the heuristic scorer adds random jitter.
    pub jitter: bool,
    /// Fixed jitter seed for reproducible runs.
    pub jitter_seed: Option<u64>,
    /// Bind address for the reference classifier server.
    pub bind: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Every variable is optional. Numeric values that fail to parse are
    /// errors rather than silently falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let classifier_url = match lookup("SHORTSAFE_CLASSIFIER_URL") {
            None => Some(DEFAULT_CLASSIFIER_URL.to_string()),
            Some(v) if v.trim().is_empty() || v.trim().eq_ignore_ascii_case("off") => None,
            Some(v) => Some(v.trim().to_string()),
        };

        let classifier_timeout = match lookup("SHORTSAFE_CLASSIFIER_TIMEOUT_MS") {
            None => DEFAULT_TIMEOUT,
            Some(v) => {
                let ms: u64 = v
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid SHORTSAFE_CLASSIFIER_TIMEOUT_MS: '{v}'"))?;
                if ms == 0 {
                    anyhow::bail!("SHORTSAFE_CLASSIFIER_TIMEOUT_MS must be greater than zero");
                }
                Duration::from_millis(ms)
            }
        };

        let jitter = match lookup("SHORTSAFE_JITTER") {
            Some(v) => !["off", "0", "false"]
                .iter()
                .any(|off| v.trim().eq_ignore_ascii_case(off)),
            // unset keeps the jitter
            None => true,
        };

        let jitter_seed = lookup("SHORTSAFE_JITTER_SEED")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid SHORTSAFE_JITTER_SEED: '{v}'"))
            })
            .transpose()?;

        let port = lookup("SHORTSAFE_PORT")
            .map(|v| {
                v.trim()
                    .parse::<u16>()
                    .with_context(|| format!("Invalid SHORTSAFE_PORT: '{v}'"))
            })
            .transpose()?
            .unwrap_or(5000);

        Ok(Self {
            classifier_url,
            classifier_timeout,
            jitter,
            jitter_seed,
            bind: lookup("SHORTSAFE_BIND")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
        })
    }

    /// Build the noise source the heuristic scorer should use.
    pub fn noise_source(&self) -> Arc<dyn NoiseSource> {
        match (self.jitter, self.jitter_seed) {
            (false, _) => Arc::new(NoNoise),
            (true, Some(seed)) => Arc::new(UniformJitter::seeded(seed)),
            (true, None) => Arc::new(UniformJitter::from_os()),
        }
    }

    /// Build the remote classifier, or the offline stand-in when disabled.
    pub fn classifier(&self) -> Result<Arc<dyn Classifier>> {
        match &self.classifier_url {
            Some(url) => Ok(Arc::new(RemoteClassifier::new(url, self.classifier_timeout)?)),
            None => Ok(Arc::new(OfflineClassifier)),
        }
    }

    /// Require a remote classifier URL (for commands that only talk to it).
    pub fn require_classifier_url(&self) -> Result<&str> {
        self.classifier_url.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "SHORTSAFE_CLASSIFIER_URL is disabled. Set it to the classifier's base URL, \
                 e.g. {DEFAULT_CLASSIFIER_URL}"
            )
        })
    }

    /// Wire up a Detector over the default lexicon.
    pub fn detector(&self, lexicon: Arc<Lexicon>) -> Result<Detector> {
        let scorer = HeuristicScorer::new(lexicon, self.noise_source());
        Ok(Detector::new(self.classifier()?, scorer).with_timeout(self.classifier_timeout))
    }
}
