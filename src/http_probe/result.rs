use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use unicode_truncate::UnicodeTruncateStr;

/// Longest slice of a response body that is echoed into diagnostics.
const BODY_PREVIEW_WIDTH: usize = 120;

/// The ways a single status probe can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid JSON response")]
    InvalidBody,

    #[error("Status endpoint returned wrong data")]
    WrongValue,
}

/// Classification of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail(ProbeError),
}

impl Outcome {
    pub fn connection(message: impl Into<String>) -> Self {
        Outcome::Fail(ProbeError::Connection(message.into()))
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    /// Process exit code for this outcome: 0 on pass, 1 on any failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Pass => 0,
            Outcome::Fail(_) => 1,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "✓ Status endpoint test passed"),
            Outcome::Fail(err) => write!(f, "✗ {err}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub url: String,
    pub outcome: Outcome,
    /// Response payload, kept for diagnostics. `None` when no response was read.
    pub raw_body: Option<String>,
    pub http_status: Option<u16>,
    pub elapsed: Duration,
    pub finished_at: DateTime<Utc>,
}

impl ProbeResult {
    pub fn exit_code(&self) -> u8 {
        self.outcome.exit_code()
    }

    /// The start of the body, cut on a character boundary.
    pub fn body_preview(&self) -> Option<&str> {
        self.raw_body
            .as_deref()
            .map(|body| body.unicode_truncate(BODY_PREVIEW_WIDTH).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_body(body: &str) -> ProbeResult {
        ProbeResult {
            url: "http://localhost:3000/status".to_string(),
            outcome: Outcome::Fail(ProbeError::InvalidBody),
            raw_body: Some(body.to_string()),
            http_status: Some(200),
            elapsed: Duration::from_millis(3),
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn test_outcome_lines() {
        assert_eq!(Outcome::Pass.to_string(), "✓ Status endpoint test passed");
        assert_eq!(
            Outcome::Fail(ProbeError::WrongValue).to_string(),
            "✗ Status endpoint returned wrong data"
        );
        assert_eq!(
            Outcome::Fail(ProbeError::InvalidBody).to_string(),
            "✗ Invalid JSON response"
        );
        assert_eq!(
            Outcome::connection("connection refused").to_string(),
            "✗ Connection failed: connection refused"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Pass.exit_code(), 0);
        assert_eq!(Outcome::Fail(ProbeError::WrongValue).exit_code(), 1);
        assert_eq!(Outcome::Fail(ProbeError::InvalidBody).exit_code(), 1);
        assert_eq!(Outcome::connection("boom").exit_code(), 1);
    }

    #[test]
    fn test_body_preview_truncates_on_char_boundary() {
        let long = "é".repeat(500);
        let result = result_with_body(&long);
        let preview = result.body_preview().expect("preview");
        assert_eq!(preview.chars().count(), BODY_PREVIEW_WIDTH);

        let short = result_with_body("not-json");
        assert_eq!(short.body_preview(), Some("not-json"));
    }
}
