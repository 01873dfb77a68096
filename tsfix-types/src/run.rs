use crate::diagnostic::Diagnostic;
use crate::fix::FixResult;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate of one resolve-and-verify cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub schema: String,
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub project_dir: Utf8PathBuf,
    pub dry_run: bool,

    /// Diagnostics on the first checker run.
    pub detected: u64,
    /// Results whose change is already on disk.
    pub applied: u64,
    /// Diagnostics on the verifying checker run.
    pub remaining: u64,
    /// `detected - remaining`; negative when fixes introduced new errors.
    pub fixed_count: i64,
    /// Remaining diagnostics that match a first-run diagnostic by identity.
    pub persisting: u64,
    /// Remaining diagnostics with no first-run counterpart.
    pub introduced: u64,
    pub success: bool,

    #[serde(default)]
    pub results: Vec<FixResult>,
    /// Diagnostics reported by the verifying checker run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub still_failing: Vec<Diagnostic>,
}

impl RunResult {
    pub fn new(project_dir: Utf8PathBuf, dry_run: bool) -> Self {
        Self {
            schema: crate::schema::TSFIX_RUN_V1.to_string(),
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
            project_dir,
            dry_run,
            detected: 0,
            applied: 0,
            remaining: 0,
            fixed_count: 0,
            persisting: 0,
            introduced: 0,
            success: false,
            results: vec![],
            still_failing: vec![],
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            fixed: self.applied,
            remaining: self.remaining,
            success: self.success,
        }
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &FixResult> {
        self.results.iter().filter(|r| !r.fixed())
    }
}

/// Machine-readable summary printed on stdout for chaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub fixed: u64,
    pub remaining: u64,
    pub success: bool,
}
