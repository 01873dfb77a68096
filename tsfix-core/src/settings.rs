//! Clap-free settings for the resolve pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use std::time::Duration;

pub const DEFAULT_CHECKER_PROGRAM: &str = "npx";
pub const DEFAULT_CHECKER_TIMEOUT: Duration = Duration::from_secs(120);
pub const APP_TSCONFIG: &str = "tsconfig.app.json";

pub fn default_exclude() -> Vec<String> {
    ["*.d.ts", "node_modules/**", "dist/**", "build/**"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// How to invoke the type-checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerSettings {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl CheckerSettings {
    /// `npx vue-tsc --noEmit [--project tsconfig.app.json] --pretty false`.
    ///
    /// The `--project` flag is only passed when the app tsconfig exists.
    pub fn for_project(project_dir: &Utf8Path) -> Self {
        let mut args = vec!["vue-tsc".to_string(), "--noEmit".to_string()];
        if project_dir.join(APP_TSCONFIG).is_file() {
            args.push("--project".to_string());
            args.push(APP_TSCONFIG.to_string());
        }
        args.push("--pretty".to_string());
        args.push("false".to_string());
        Self {
            program: DEFAULT_CHECKER_PROGRAM.to_string(),
            args,
            timeout: DEFAULT_CHECKER_TIMEOUT,
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Settings for one resolve cycle.
#[derive(Debug, Clone)]
pub struct ResolveSettings {
    pub project_dir: Utf8PathBuf,
    /// Compute fixes but leave sources untouched and skip the verifying re-check.
    pub dry_run: bool,
    /// Glob patterns, relative to the project, whose diagnostics are never fixed.
    pub exclude: Vec<String>,
    /// Diagnostic codes (without `TS`) that are reported but never fixed.
    pub disabled_codes: Vec<String>,
}

impl ResolveSettings {
    pub fn new(project_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            dry_run: false,
            exclude: default_exclude(),
            disabled_codes: Vec::new(),
        }
    }
}
