//! Documentation sample verification
//!
//! Runs the linear pipeline for one documentation file:
//!
//! 1. Load the document (missing file fails)
//! 2. Extract the first fenced sample (none found skips)
//! 3. Execute it through a [`SampleRunner`] with output captured in memory
//!    (any execution error fails)
//! 4. Parse the labelled metrics out of the captured output (an unparsable
//!    number is returned as `Err`)
//! 5. Compare each metric against its reference as an independent sub-check
//!
//! # Example
//!
//! ```rust,no_run
//! use harness::{RunnerConfig, SampleVerifier, SubprocessRunner};
//! use sample::VerifierConfig;
//! use std::path::Path;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let runner = SubprocessRunner::new(RunnerConfig::default());
//! let verifier = SampleVerifier::new(VerifierConfig::default(), runner);
//!
//! let verdict = verifier.verify(Path::new("."))?;
//! assert!(verdict.is_pass(), "README sample should reproduce its numbers");
//! # Ok(())
//! # }
//! ```

use sample::prelude::*;
use std::path::Path;
use tracing::{info, warn};

pub struct SampleVerifier<R: SampleRunner> {
    config: VerifierConfig,
    runner: R,
}

impl<R: SampleRunner> SampleVerifier<R> {
    pub fn new(config: VerifierConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Verify the configured document under `base_dir`.
    ///
    /// Every anticipated problem becomes a [`Verdict`]; only a labelled
    /// value that is not a number (or an unusable configuration) is
    /// returned as an error.
    pub fn verify(&self, base_dir: &Path) -> VerifyResult<Verdict> {
        self.config
            .validate()
            .map_err(|message| VerifyError::InvalidConfig { message })?;

        let document = match load_document(base_dir, &self.config.document_name) {
            Ok(document) => document,
            Err(e) => {
                warn!("{}", e);
                return Ok(Verdict::fail(e.to_string()));
            }
        };

        self.verify_document(&document)
    }

    pub fn verify_document(&self, document: &DocumentSource) -> VerifyResult<Verdict> {
        let Some(mut sample) = extract_sample(
            &document.text,
            &self.config.fence_language,
            self.config.fence_match,
        )?
        else {
            info!("No {} sample in {}", self.config.fence_language, document.name);
            return Ok(Verdict::skip(format!(
                "No sample found inside {}.",
                document.name
            )));
        };

        if let Some(dir) = document.directory() {
            sample = sample.with_directory(dir);
        }

        let output = match self.capture(&sample) {
            Ok(output) => output,
            Err(e) => {
                warn!("Sample from {} failed: {}", document.name, e);
                return Ok(Verdict::fail(e.to_string()));
            }
        };

        let metrics = parse_metrics(
            &output,
            MetricLabels {
                estimation: &self.config.estimation.label,
                probability: &self.config.probability.label,
            },
        )?;

        let checks = match check_metrics(&metrics, &self.config) {
            Ok(checks) => checks,
            Err(e) => {
                warn!("{}", e);
                return Ok(Verdict::fail(e.to_string()));
            }
        };

        let verdict = Verdict::from_checks(checks);
        info!("{} {}", verdict.label(), document.path.display());
        Ok(verdict)
    }

    /// Run the sample with a fresh buffer as its stdout.
    fn capture(&self, sample: &CodeSample) -> ExecutionResult<String> {
        let mut buffer = Vec::new();
        self.runner.run(sample, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
