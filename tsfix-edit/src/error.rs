//! Error types for tsfix-edit.
//!
//! A conflict (the file changed between read and write) is kept apart from plain I/O failures
//! so the orchestrator can report it distinctly.

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    /// The target line does not exist in the content being edited.
    #[error("line {line} out of range ({len} lines)")]
    LineOutOfRange { line: usize, len: usize },

    /// The outcome carried no change.
    #[error("nothing to apply: {reason}")]
    NoChange { reason: String },

    /// The file on disk no longer matches what the change was computed from.
    #[error("{path} changed on disk since it was read (expected sha256 {expected}, found {actual})")]
    Conflict {
        path: Utf8PathBuf,
        expected: String,
        actual: String,
    },

    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

impl EditError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, EditError::Conflict { .. })
    }
}

pub type EditResult<T> = Result<T, EditError>;
