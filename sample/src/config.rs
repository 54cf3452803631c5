use serde::{Deserialize, Serialize};

/// How far the fence pattern reaches once an opening marker is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FenceMatch {
    /// Up to the last closing fence in the document.
    #[default]
    Greedy,
    /// Up to the first closing fence after the opening marker.
    Lazy,
}

/// A labelled value the sample prints, and the reference it must match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTarget {
    pub label: String,
    pub expected: f64,
}

impl MetricTarget {
    pub fn new(label: impl Into<String>, expected: f64) -> Self {
        Self {
            label: label.into(),
            expected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    pub document_name: String,
    pub fence_language: String,
    pub fence_match: FenceMatch,
    pub estimation: MetricTarget,
    pub probability: MetricTarget,
    /// Decimal places compared, as in "almost equal to N places".
    pub places: u32,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            document_name: "README.md".to_string(),
            fence_language: "python".to_string(),
            fence_match: FenceMatch::Greedy,
            estimation: MetricTarget::new("Estimated value:", 2.46),
            probability: MetricTarget::new("Probability:", 0.8487),
            places: 4,
        }
    }
}

impl VerifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = name.into();
        self
    }

    pub fn with_fence_language(mut self, language: impl Into<String>) -> Self {
        self.fence_language = language.into();
        self
    }

    pub fn with_fence_match(mut self, mode: FenceMatch) -> Self {
        self.fence_match = mode;
        self
    }

    pub fn with_estimation(mut self, target: MetricTarget) -> Self {
        self.estimation = target;
        self
    }

    pub fn with_probability(mut self, target: MetricTarget) -> Self {
        self.probability = target;
        self
    }

    pub fn with_places(mut self, places: u32) -> Self {
        self.places = places;
        self
    }

    /// Absolute error allowed by `places`: half a unit in the last place.
    pub fn tolerance(&self) -> f64 {
        0.5 / 10f64.powi(self.places as i32)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.document_name.trim().is_empty() {
            return Err("Document name cannot be empty".to_string());
        }

        if self.fence_language.trim().is_empty() {
            return Err("Fence language cannot be empty".to_string());
        }

        if self.estimation.label.is_empty() || self.probability.label.is_empty() {
            return Err("Metric labels cannot be empty".to_string());
        }

        if self.estimation.label == self.probability.label {
            return Err(format!(
                "Estimation and probability labels must differ, both are '{}'",
                self.estimation.label
            ));
        }

        if !self.estimation.expected.is_finite() || !self.probability.expected.is_finite() {
            return Err("Reference values must be finite".to_string());
        }

        if self.places > 15 {
            return Err("Places must be at most 15".to_string());
        }

        Ok(())
    }
}
