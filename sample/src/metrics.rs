use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A label was found but the text after it is not a number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not convert text after '{label}' to a number: '{text}'")]
pub struct FormatError {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetrics {
    pub estimation: Option<f64>,
    pub probability: Option<f64>,
}

impl ExtractedMetrics {
    pub fn is_complete(&self) -> bool {
        self.estimation.is_some() && self.probability.is_some()
    }
}

/// The two label prefixes scanned for in captured output.
#[derive(Debug, Clone, Copy)]
pub struct MetricLabels<'a> {
    pub estimation: &'a str,
    pub probability: &'a str,
}

fn parse_after(line: &str, idx: usize, label: &str) -> Result<f64, FormatError> {
    let text = &line[idx + label.len()..];
    text.trim().parse::<f64>().map_err(|_| FormatError {
        label: label.to_string(),
        text: text.to_string(),
    })
}

/// Scan `output` line by line for the labelled values.
///
/// The first occurrence of each label wins. A line holding the estimation
/// label is not inspected for the probability label. Scanning stops once
/// both values are found.
pub fn parse_metrics(output: &str, labels: MetricLabels<'_>) -> Result<ExtractedMetrics, FormatError> {
    let mut metrics = ExtractedMetrics::default();

    for line in output.split('\n') {
        if let Some(idx) = line.find(labels.estimation) {
            if metrics.estimation.is_none() {
                metrics.estimation = Some(parse_after(line, idx, labels.estimation)?);
            }
        } else if let Some(idx) = line.find(labels.probability) {
            if metrics.probability.is_none() {
                metrics.probability = Some(parse_after(line, idx, labels.probability)?);
            }
        }

        if metrics.is_complete() {
            break;
        }
    }

    Ok(metrics)
}
