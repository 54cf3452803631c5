use crate::extract::CodeSample;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No interpreter available to run {language} samples")]
    InterpreterUnavailable { language: String },

    #[error("Failed to start '{command}': {reason}")]
    Spawn { command: String, reason: String },

    #[error("{message}")]
    Exited { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Executes an extracted sample in isolation.
///
/// Everything the sample writes to its standard output goes to `sink`; the
/// host process's own stdout is never touched.
pub trait SampleRunner {
    fn run(&self, sample: &CodeSample, sink: &mut dyn Write) -> ExecutionResult<()>;

    fn runner_name(&self) -> &str;
}
