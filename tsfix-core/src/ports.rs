//! Port traits abstracting I/O away from the pipeline.

use camino::Utf8Path;
use std::future::Future;

/// How a checker invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerStatus {
    /// The process ran to completion. A non-zero code is normal when errors exist.
    Exited(Option<i32>),
    /// Killed after the configured timeout; output is empty.
    TimedOut,
    /// The process could not be started at all.
    SpawnFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerRun {
    pub status: CheckerStatus,
    /// Combined stdout and stderr.
    pub output: String,
}

impl CheckerRun {
    pub fn exited(code: i32, output: impl Into<String>) -> Self {
        Self {
            status: CheckerStatus::Exited(Some(code)),
            output: output.into(),
        }
    }
}

/// The external type-checker.
pub trait Checker {
    fn check(&self) -> impl Future<Output = CheckerRun>;
}

/// File-system write operations for session artifacts.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
