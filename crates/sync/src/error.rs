use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A single note could not be read into a payload.
    #[error("{message} ({})", path.display())]
    Note { path: PathBuf, message: String },

    #[error("git {args} failed ({status})")]
    Git { args: String, status: String },

    #[error("Failed to resolve content source: {0}")]
    ContentSource(String),

    #[error("Failed to walk {}: {message}", root.display())]
    Walk { root: PathBuf, message: String },
}

impl SyncError {
    pub(crate) fn note(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Note {
            path: path.into(),
            message: message.into(),
        }
    }
}
