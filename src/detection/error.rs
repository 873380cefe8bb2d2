// Remote classifier failure taxonomy.
//
// Every variant means the same thing to the orchestrator: the remote path is
// unusable for this call, score locally instead. The variants exist for logs
// and tests.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierUnavailable {
    #[error("no remote classifier configured")]
    NotConfigured,

    #[error("classifier request timed out")]
    Timeout,

    #[error("classifier request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("classifier returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed classifier response: {0}")]
    Malformed(String),

    #[error("batch classifier returned {got} results for {expected} texts")]
    BatchMismatch { expected: usize, got: usize },
}

impl From<reqwest::Error> for ClassifierUnavailable {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClassifierUnavailable::Timeout
        } else if err.is_decode() {
            ClassifierUnavailable::Malformed(err.to_string())
        } else {
            ClassifierUnavailable::Network(err)
        }
    }
}
