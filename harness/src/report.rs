use chrono::{DateTime, Utc};
use clap::ValueEnum;
use sample::{Verdict, VerifyResult};
use serde::Serialize;
use std::path::PathBuf;

/// Output formats for a verification report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

pub const EXIT_PASS: u8 = 0;
pub const EXIT_FAIL: u8 = 1;
pub const EXIT_ERROR: u8 = 2;
pub const EXIT_SKIP_STRICT: u8 = 3;

/// Process exit code for a verification, including the raw error path.
pub fn exit_code(result: &VerifyResult<Verdict>, fail_on_skip: bool) -> u8 {
    match result {
        Ok(Verdict::Passed { .. }) => EXIT_PASS,
        Ok(Verdict::Failed { .. }) => EXIT_FAIL,
        Ok(Verdict::Skipped { .. }) if fail_on_skip => EXIT_SKIP_STRICT,
        Ok(Verdict::Skipped { .. }) => EXIT_PASS,
        Err(_) => EXIT_ERROR,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub document: PathBuf,
    pub checked_at: DateTime<Utc>,
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl Report {
    pub fn new(document: impl Into<PathBuf>, verdict: Verdict) -> Self {
        Self {
            document: document.into(),
            checked_at: Utc::now(),
            verdict,
        }
    }

    pub fn render(&self, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    fn render_text(&self) -> String {
        let document = self.document.display();
        let mut out = match &self.verdict {
            Verdict::Passed { .. } => format!("PASS {document}\n"),
            Verdict::Failed { failures, .. } => {
                let mut text = format!("FAIL {document}\n");
                for failure in failures {
                    text.push_str(&format!("  - {failure}\n"));
                }
                text
            }
            Verdict::Skipped { reason } => format!("SKIP {document}: {reason}\n"),
        };

        for check in self.verdict.checks() {
            let status = if check.passed { "ok" } else { "MISMATCH" };
            out.push_str(&format!(
                "  {}: {} vs {} (±{}) {}\n",
                check.name, check.actual, check.expected, check.tolerance, status
            ));
        }

        out
    }
}
