pub mod config;
pub mod interpreter;
pub mod report;
pub mod verifier;

pub use config::{ConfigError, Overrides, Settings, DEFAULT_CONFIG_FILE};
pub use interpreter::{detect_interpreter, Interpreter, RunnerConfig, SubprocessRunner};
pub use report::{exit_code, Report, ReportFormat};
pub use verifier::SampleVerifier;
