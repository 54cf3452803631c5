use regex::Regex;
use sample::{CodeSample, ExecutionError, ExecutionResult, SampleRunner};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Interpreters a sample can be handed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpreter {
    /// `python3` on the PATH
    Python3,
    /// `python` on the PATH
    Python,
    /// An explicitly configured program
    Custom(String),
    /// Nothing usable was found
    None,
}

impl Interpreter {
    /// Get the command name for this interpreter
    pub fn command(&self) -> &str {
        match self {
            Interpreter::Python3 => "python3",
            Interpreter::Python => "python",
            Interpreter::Custom(program) => program.as_str(),
            Interpreter::None => "",
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Interpreter::None)
    }
}

fn responds_to_version(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// Detect an available Python interpreter in order of preference
pub fn detect_interpreter() -> Interpreter {
    if responds_to_version("python3") {
        return Interpreter::Python3;
    }

    if responds_to_version("python") {
        return Interpreter::Python;
    }

    Interpreter::None
}

/// Configuration for the subprocess a sample runs in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Program to run instead of the detected interpreter
    pub interpreter: Option<String>,
    /// Arguments placed before the script path
    pub args: Vec<String>,
    /// Working directory; the sample's own directory when unset
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables
    pub env_vars: Vec<(String, String)>,
}

impl RunnerConfig {
    pub fn with_interpreter(mut self, program: impl Into<String>) -> Self {
        self.interpreter = Some(program.into());
        self
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }
}

/// Runs a sample as a script file in a child interpreter process.
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    interpreter: Interpreter,
    config: RunnerConfig,
}

impl SubprocessRunner {
    /// Use the configured interpreter, or detect one.
    pub fn new(config: RunnerConfig) -> Self {
        let interpreter = match &config.interpreter {
            Some(program) => Interpreter::Custom(program.clone()),
            None => detect_interpreter(),
        };
        Self {
            interpreter,
            config,
        }
    }

    pub fn with_interpreter(interpreter: Interpreter, config: RunnerConfig) -> Self {
        Self {
            interpreter,
            config,
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    fn command_line(&self) -> String {
        let mut parts = vec![self.interpreter.command().to_string()];
        parts.extend(self.config.args.iter().cloned());
        parts.join(" ")
    }
}

impl SampleRunner for SubprocessRunner {
    fn run(&self, sample: &CodeSample, sink: &mut dyn Write) -> ExecutionResult<()> {
        if !self.interpreter.is_available() {
            return Err(ExecutionError::InterpreterUnavailable {
                language: sample.language.clone(),
            });
        }

        // Removed when dropped, on every return path
        let mut script = NamedTempFile::new()?;
        script.write_all(sample.code.as_bytes())?;
        script.flush()?;

        let mut cmd = Command::new(self.interpreter.command());
        cmd.args(&self.config.args)
            .arg(script.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = self.config.working_dir.as_ref().or(sample.directory.as_ref()) {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.config.env_vars {
            cmd.env(key, value);
        }

        info!("Running {} sample with {}", sample.language, self.command_line());
        let output = cmd.output().map_err(|e| ExecutionError::Spawn {
            command: self.command_line(),
            reason: e.to_string(),
        })?;

        sink.write_all(&output.stdout)?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr, "sample stderr");
        }

        if !output.status.success() {
            return Err(ExecutionError::Exited {
                message: exit_message(&stderr, output.status),
            });
        }

        Ok(())
    }

    fn runner_name(&self) -> &str {
        self.interpreter.command()
    }
}

/// The last non-empty stderr line, which for a Python traceback is the
/// exception itself. A leading `Type: ` is dropped so only the message is
/// kept; a line without one is kept whole.
fn exit_message(stderr: &str, status: ExitStatus) -> String {
    let Some(line) = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
    else {
        return format!("sample exited with {status}");
    };

    match Regex::new(r"^\w+(\.\w+)*: ") {
        Ok(prefix) => prefix.replace(line, "").into_owned(),
        Err(_) => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpreter_command() {
        assert_eq!(Interpreter::Python3.command(), "python3");
        assert_eq!(Interpreter::Python.command(), "python");
        assert_eq!(
            Interpreter::Custom("/opt/py/bin/python".to_string()).command(),
            "/opt/py/bin/python"
        );
        assert_eq!(Interpreter::None.command(), "");
    }

    #[test]
    fn test_interpreter_availability() {
        assert!(Interpreter::Python3.is_available());
        assert!(Interpreter::Custom("sh".to_string()).is_available());
        assert!(!Interpreter::None.is_available());
    }

    #[test]
    fn test_detect_interpreter() {
        // Depends on the machine; only the variant set is fixed
        match detect_interpreter() {
            Interpreter::Python3 | Interpreter::Python | Interpreter::None => {}
            Interpreter::Custom(program) => panic!("detection never yields custom: {program}"),
        }
    }

    #[test]
    fn test_configured_interpreter_skips_detection() {
        let runner = SubprocessRunner::new(RunnerConfig::default().with_interpreter("sh"));
        assert_eq!(runner.interpreter(), &Interpreter::Custom("sh".to_string()));
        assert_eq!(runner.runner_name(), "sh");
    }

    #[test]
    fn test_runner_config_builder() {
        let config = RunnerConfig::default()
            .with_interpreter("python3")
            .with_arg("-I")
            .with_working_dir("/tmp")
            .with_env("PYTHONHASHSEED", "0");

        assert_eq!(config.interpreter.as_deref(), Some("python3"));
        assert_eq!(config.args, vec!["-I".to_string()]);
        assert_eq!(config.working_dir, Some(PathBuf::from("/tmp")));
        assert_eq!(config.env_vars.len(), 1);
    }

    #[test]
    fn test_no_interpreter_is_an_execution_error() {
        let runner = SubprocessRunner::with_interpreter(Interpreter::None, RunnerConfig::default());
        let mut sink = Vec::new();
        let result = runner.run(&CodeSample::new("python", "print(1)"), &mut sink);
        assert!(matches!(
            result,
            Err(ExecutionError::InterpreterUnavailable { .. })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let runner = SubprocessRunner::with_interpreter(
            Interpreter::Custom("/nonexistent/interpreter".to_string()),
            RunnerConfig::default(),
        );
        let mut sink = Vec::new();
        let err = runner
            .run(&CodeSample::new("python", "print(1)"), &mut sink)
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/interpreter"));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_sample_output_goes_to_sink() {
        let runner = SubprocessRunner::with_interpreter(
            Interpreter::Custom("sh".to_string()),
            RunnerConfig::default().with_env("SAMPLE_VALUE", "2.46"),
        );
        let mut sink = Vec::new();
        runner
            .run(
                &CodeSample::new("sh", "echo \"Estimated value: $SAMPLE_VALUE\"\n"),
                &mut sink,
            )
            .unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "Estimated value: 2.46\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_sample_reports_exception_message() {
        let runner = SubprocessRunner::with_interpreter(
            Interpreter::Custom("sh".to_string()),
            RunnerConfig::default(),
        );
        let mut sink = Vec::new();
        let err = runner
            .run(
                &CodeSample::new(
                    "sh",
                    "echo partial\necho trace >&2\necho 'ValueError: bad input' >&2\nexit 1\n",
                ),
                &mut sink,
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "bad input");
        assert_eq!(String::from_utf8(sink).unwrap(), "partial\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_plain_stderr_line_is_kept_whole() {
        let runner = SubprocessRunner::with_interpreter(
            Interpreter::Custom("sh".to_string()),
            RunnerConfig::default(),
        );
        let mut sink = Vec::new();
        let err = runner
            .run(
                &CodeSample::new("sh", "echo 'weights do not sum to 1' >&2\nexit 1\n"),
                &mut sink,
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "weights do not sum to 1");
    }

    #[cfg(unix)]
    #[test]
    fn test_dotted_exception_type_is_dropped() {
        let runner = SubprocessRunner::with_interpreter(
            Interpreter::Custom("sh".to_string()),
            RunnerConfig::default(),
        );
        let mut sink = Vec::new();
        let err = runner
            .run(
                &CodeSample::new(
                    "sh",
                    "echo 'numpy.linalg.LinAlgError: Singular matrix' >&2\nexit 1\n",
                ),
                &mut sink,
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "Singular matrix");
    }

    #[cfg(unix)]
    #[test]
    fn test_sample_runs_in_its_document_directory() {
        let docs = tempfile::TempDir::new().unwrap();
        std::fs::write(docs.path().join("values.txt"), "Estimated value: 2.46\n").unwrap();

        let runner = SubprocessRunner::with_interpreter(
            Interpreter::Custom("sh".to_string()),
            RunnerConfig::default(),
        );
        let sample = CodeSample::new("sh", "cat values.txt\n").with_directory(docs.path());
        let mut sink = Vec::new();
        runner.run(&sample, &mut sink).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "Estimated value: 2.46\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_working_dir_wins_over_document_directory() {
        let docs = tempfile::TempDir::new().unwrap();
        let other = tempfile::TempDir::new().unwrap();
        std::fs::write(docs.path().join("values.txt"), "from docs\n").unwrap();
        std::fs::write(other.path().join("values.txt"), "from config\n").unwrap();

        let runner = SubprocessRunner::with_interpreter(
            Interpreter::Custom("sh".to_string()),
            RunnerConfig::default().with_working_dir(other.path()),
        );
        let sample = CodeSample::new("sh", "cat values.txt\n").with_directory(docs.path());
        let mut sink = Vec::new();
        runner.run(&sample, &mut sink).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "from config\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_failure_reports_status() {
        let runner = SubprocessRunner::with_interpreter(
            Interpreter::Custom("sh".to_string()),
            RunnerConfig::default(),
        );
        let mut sink = Vec::new();
        let err = runner
            .run(&CodeSample::new("sh", "exit 3\n"), &mut sink)
            .unwrap_err();
        assert!(err.to_string().starts_with("sample exited with"));
    }
}
