use crate::config::VerifierConfig;
use crate::metrics::ExtractedMetrics;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ESTIMATION_CHECK: &str = "estimation";
pub const PROBABILITY_CHECK: &str = "max.probability";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to find {metric} inside {document}.")]
pub struct MetricNotFound {
    pub metric: String,
    pub document: String,
}

/// Outcome of comparing one parsed value against its reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCheck {
    pub name: String,
    pub actual: f64,
    pub expected: f64,
    pub tolerance: f64,
    pub passed: bool,
}

impl SubCheck {
    pub fn compare(name: impl Into<String>, actual: f64, expected: f64, tolerance: f64) -> Self {
        Self {
            name: name.into(),
            actual,
            expected,
            tolerance,
            passed: (actual - expected).abs() <= tolerance,
        }
    }

    pub fn failure_message(&self) -> String {
        format!(
            "{}: {} != {} within {}",
            self.name, self.actual, self.expected, self.tolerance
        )
    }
}

/// Require both metrics, then run both reference comparisons.
///
/// Every comparison runs even when an earlier one fails.
pub fn check_metrics(
    metrics: &ExtractedMetrics,
    config: &VerifierConfig,
) -> Result<Vec<SubCheck>, MetricNotFound> {
    let not_found = |metric: &str| MetricNotFound {
        metric: metric.to_string(),
        document: config.document_name.clone(),
    };
    let estimation = metrics.estimation.ok_or_else(|| not_found(ESTIMATION_CHECK))?;
    let probability = metrics.probability.ok_or_else(|| not_found(PROBABILITY_CHECK))?;

    let tolerance = config.tolerance();
    Ok(vec![
        SubCheck::compare(
            ESTIMATION_CHECK,
            estimation,
            config.estimation.expected,
            tolerance,
        ),
        SubCheck::compare(
            PROBABILITY_CHECK,
            probability,
            config.probability.expected,
            tolerance,
        ),
    ])
}
