use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("{name} not found at {}", .path.display())]
    MissingFile { name: String, path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Documentation file contents, loaded once per verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    pub name: String,
    pub path: PathBuf,
    pub text: String,
}

impl DocumentSource {
    /// Directory holding the document; samples run from here.
    pub fn directory(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

/// Resolve `name` under `base_dir`, requiring a regular file.
pub fn locate_document(base_dir: &Path, name: &str) -> DocumentResult<PathBuf> {
    let path = base_dir.join(name);
    if !path.is_file() {
        return Err(DocumentError::MissingFile {
            name: name.to_string(),
            path,
        });
    }
    Ok(path)
}

pub fn load_document(base_dir: &Path, name: &str) -> DocumentResult<DocumentSource> {
    let path = locate_document(base_dir, name)?;
    let text = fs::read_to_string(&path).map_err(|source| DocumentError::Unreadable {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "loaded document");

    Ok(DocumentSource {
        name: name.to_string(),
        path,
        text,
    })
}
