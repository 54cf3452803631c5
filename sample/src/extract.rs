use crate::config::FenceMatch;
use regex::Regex;
use std::path::PathBuf;
use tracing::debug;

const FENCE: &str = "```";

/// Code text taken from between the fence markers of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSample {
    pub language: String,
    pub code: String,
    /// Directory of the document the sample came from.
    pub directory: Option<PathBuf>,
}

impl CodeSample {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            code: code.into(),
            directory: None,
        }
    }

    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }
}

fn fence_pattern(language: &str, mode: FenceMatch) -> Result<Regex, regex::Error> {
    let body = match mode {
        FenceMatch::Greedy => ".*",
        FenceMatch::Lazy => ".*?",
    };
    Regex::new(&format!(
        "(?s){FENCE}{}{body}{FENCE}",
        regex::escape(language)
    ))
}

/// Extract the first fenced block tagged `language`, without its markers.
///
/// Only the first match is consumed. `None` means the document carries no
/// sample at all.
pub fn extract_sample(
    text: &str,
    language: &str,
    mode: FenceMatch,
) -> Result<Option<CodeSample>, regex::Error> {
    let Some(matched) = fence_pattern(language, mode)?.find(text) else {
        return Ok(None);
    };
    let block = matched.as_str();
    let open = FENCE.len() + language.len();
    let code = &block[open..block.len() - FENCE.len()];
    debug!(
        start = matched.start(),
        end = matched.end(),
        "extracted {} sample",
        language
    );

    Ok(Some(CodeSample::new(language, code)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "# Finance\n\nInstall it.\n\n```python\nprint('Estimated value: 2.46')\nprint('Probability: 0.8487')\n```\n\nMore text.\n";

    #[test]
    fn test_extract_first_python_block() {
        let sample = extract_sample(README, "python", FenceMatch::Greedy).unwrap().unwrap();
        assert_eq!(sample.language, "python");
        assert_eq!(
            sample.code,
            "\nprint('Estimated value: 2.46')\nprint('Probability: 0.8487')\n"
        );
    }

    #[test]
    fn test_no_sample() {
        assert!(extract_sample("# Title\n\nNo code here.\n", "python", FenceMatch::Greedy)
            .unwrap()
            .is_none());
        assert!(extract_sample("```bash\nls\n```\n", "python", FenceMatch::Greedy)
            .unwrap()
            .is_none());
        assert!(extract_sample("```python\nunterminated\n", "python", FenceMatch::Lazy)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_greedy_runs_to_last_fence() {
        let text = "```python\nx = 1\n```\nprose\n```bash\nls\n```\n";

        let greedy = extract_sample(text, "python", FenceMatch::Greedy).unwrap().unwrap();
        assert_eq!(greedy.code, "\nx = 1\n```\nprose\n```bash\nls\n");

        let lazy = extract_sample(text, "python", FenceMatch::Lazy).unwrap().unwrap();
        assert_eq!(lazy.code, "\nx = 1\n");
    }

    #[test]
    fn test_empty_block() {
        let sample = extract_sample("```python```", "python", FenceMatch::Greedy).unwrap().unwrap();
        assert_eq!(sample.code, "");
    }

    #[test]
    fn test_language_is_escaped() {
        let text = "```c++\nint main() {}\n```";
        let sample = extract_sample(text, "c++", FenceMatch::Lazy).unwrap().unwrap();
        assert_eq!(sample.code, "\nint main() {}\n");
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let first = extract_sample(README, "python", FenceMatch::Greedy).unwrap();
        let second = extract_sample(README, "python", FenceMatch::Greedy).unwrap();
        assert_eq!(first, second);
    }
}
