use crate::check::SubCheck;
use crate::metrics::FormatError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that escape a verification instead of becoming a verdict.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Invalid fence pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

pub type VerifyResult<T> = Result<T, VerifyError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    Passed { checks: Vec<SubCheck> },
    Failed {
        failures: Vec<String>,
        checks: Vec<SubCheck>,
    },
    Skipped { reason: String },
}

impl Verdict {
    pub fn fail(reason: impl Into<String>) -> Self {
        Verdict::Failed {
            failures: vec![reason.into()],
            checks: Vec::new(),
        }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Verdict::Skipped {
            reason: reason.into(),
        }
    }

    /// Pass when every sub-check passed, otherwise fail listing each mismatch.
    pub fn from_checks(checks: Vec<SubCheck>) -> Self {
        let failures: Vec<String> = checks
            .iter()
            .filter(|c| !c.passed)
            .map(SubCheck::failure_message)
            .collect();

        if failures.is_empty() {
            Verdict::Passed { checks }
        } else {
            Verdict::Failed { failures, checks }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Passed { .. } => "PASS",
            Verdict::Failed { .. } => "FAIL",
            Verdict::Skipped { .. } => "SKIP",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Passed { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failed { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Verdict::Skipped { .. })
    }

    pub fn checks(&self) -> &[SubCheck] {
        match self {
            Verdict::Passed { checks } | Verdict::Failed { checks, .. } => checks.as_slice(),
            Verdict::Skipped { .. } => &[],
        }
    }
}
