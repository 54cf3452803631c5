use crate::interpreter::RunnerConfig;
use sample::{FenceMatch, VerifierConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Picked up from the verified directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "readme-sample.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub file: Option<String>,
    pub language: Option<String>,
    pub lazy: bool,
    pub interpreter: Option<String>,
}

/// File-level settings: `[verifier]` and `[runner]` tables, both optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub verifier: VerifierConfig,
    pub runner: RunnerConfig,
}

impl Settings {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        settings
            .verifier
            .validate()
            .map_err(|message| ConfigError::Invalid { message })?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings");
        Self::parse(&text)
    }

    /// Apply command-line overrides, then re-check the result.
    pub fn apply_overrides(&mut self, overrides: Overrides) -> Result<(), ConfigError> {
        if let Some(file) = overrides.file {
            self.verifier.document_name = file;
        }
        if let Some(language) = overrides.language {
            self.verifier.fence_language = language;
        }
        if overrides.lazy {
            self.verifier.fence_match = FenceMatch::Lazy;
        }
        if let Some(interpreter) = overrides.interpreter {
            self.runner.interpreter = Some(interpreter);
        }

        self.verifier
            .validate()
            .map_err(|message| ConfigError::Invalid { message })
    }

    /// Load `dir/readme-sample.toml` when present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
