pub mod check;
pub mod config;
pub mod document;
pub mod extract;
pub mod metrics;
pub mod runner;
pub mod verdict;

pub use check::{check_metrics, MetricNotFound, SubCheck, ESTIMATION_CHECK, PROBABILITY_CHECK};
pub use config::{FenceMatch, MetricTarget, VerifierConfig};
pub use document::{load_document, locate_document, DocumentError, DocumentResult, DocumentSource};
pub use extract::{extract_sample, CodeSample};
pub use metrics::{parse_metrics, ExtractedMetrics, FormatError, MetricLabels};
pub use runner::{ExecutionError, ExecutionResult, SampleRunner};
pub use verdict::{Verdict, VerifyError, VerifyResult};

pub mod prelude {
    pub use crate::check::*;
    pub use crate::config::*;
    pub use crate::document::*;
    pub use crate::extract::*;
    pub use crate::metrics::*;
    pub use crate::runner::*;
    pub use crate::verdict::*;
}
