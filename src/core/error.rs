use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// Empty or malformed run id.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Base directory missing or unreadable, or a presence check could not stat its path.
    #[error("filesystem unavailable: {}: {source}", .path.display())]
    FilesystemUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template error at line {line}: {message}")]
    Template { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("format error")]
    Fmt(#[from] fmt::Error),
}

impl IndexError {
    pub fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        IndexError::FilesystemUnavailable {
            path: path.into(),
            source,
        }
    }
}
