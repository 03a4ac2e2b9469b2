use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid match file {path}: {source}")]
    InvalidMatches {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read a text file and return its content
pub fn read_text(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write content to a text file
pub fn write_text(path: &Path, content: &str) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

/// Load a JSON array of matches, e.g. `Vec<Match>` or `Vec<MatchWithReplacement>`
pub fn load_matches<M: DeserializeOwned>(path: &Path) -> Result<Vec<M>, IoError> {
    let json = read_text(path)?;
    serde_json::from_str(&json).map_err(|source| IoError::InvalidMatches {
        path: path.to_path_buf(),
        source,
    })
}
