use crate::LINE_REMOVED;
use crate::diagnostic::Diagnostic;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// What a fix strategy decided for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    NoChange { reason: String },
    ReplaceLine(String),
    DeleteLine,
}

impl FixOutcome {
    pub fn no_change(reason: impl Into<String>) -> Self {
        FixOutcome::NoChange {
            reason: reason.into(),
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FixOutcome::NoChange { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStatus {
    /// The file on disk has been rewritten.
    Applied,
    /// Dry-run: the change was computed but not written.
    Previewed,
    /// No strategy could produce a change.
    Unsupported,
    /// A strategy produced a change but reading or writing the file failed.
    Failed,
    /// Excluded by configuration or made moot by an earlier fix.
    Skipped,
}

/// Outcome of attempting to resolve one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixResult {
    pub status: FixStatus,
    pub file_path: Utf8PathBuf,
    pub line: u32,
    pub code: String,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_line: Option<String>,

    /// New line text, or [`LINE_REMOVED`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_line: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FixResult {
    fn base(status: FixStatus, diagnostic: &Diagnostic) -> Self {
        Self {
            status,
            file_path: diagnostic.file_path.clone(),
            line: diagnostic.line,
            code: diagnostic.code.clone(),
            message: diagnostic.message.clone(),
            original_line: None,
            fixed_line: None,
            reason: None,
        }
    }

    /// A change that was written (`applied`) or only computed (`previewed`).
    pub fn changed(
        diagnostic: &Diagnostic,
        original_line: &str,
        outcome: &FixOutcome,
        written: bool,
    ) -> Self {
        let status = if written {
            FixStatus::Applied
        } else {
            FixStatus::Previewed
        };
        let fixed_line = match outcome {
            FixOutcome::ReplaceLine(text) => Some(text.clone()),
            FixOutcome::DeleteLine => Some(LINE_REMOVED.to_string()),
            FixOutcome::NoChange { .. } => None,
        };
        Self {
            original_line: Some(original_line.to_string()),
            fixed_line,
            ..Self::base(status, diagnostic)
        }
    }

    pub fn unsupported(diagnostic: &Diagnostic, reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::base(FixStatus::Unsupported, diagnostic)
        }
    }

    pub fn failed(diagnostic: &Diagnostic, reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::base(FixStatus::Failed, diagnostic)
        }
    }

    pub fn skipped(diagnostic: &Diagnostic, reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::base(FixStatus::Skipped, diagnostic)
        }
    }

    pub fn with_original_line(mut self, line: impl Into<String>) -> Self {
        self.original_line = Some(line.into());
        self
    }

    /// True only when the file on disk already carries the change.
    pub fn fixed(&self) -> bool {
        self.status == FixStatus::Applied
    }

    pub fn removed_line(&self) -> bool {
        self.fixed_line.as_deref() == Some(LINE_REMOVED)
    }
}
