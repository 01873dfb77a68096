//! The resolve-and-verify cycle.
//!
//! Sequence: run the checker, parse, attempt one fix per diagnostic, run the checker again,
//! compare counts. Every fix attempt stands alone: one failing diagnostic never stops the rest.

use crate::ports::{Checker, CheckerRun, CheckerStatus, WritePort};
use crate::settings::ResolveSettings;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use glob::Pattern;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use tsfix_diagnostics::parse_all;
use tsfix_domain::{Dispatcher, Proposal, SourceView};
use tsfix_edit::{EditOptions, apply_line_fix};
use tsfix_render::render_run_md;
use tsfix_types::diagnostic::{Diagnostic, DiagnosticIdentity};
use tsfix_types::fix::{FixOutcome, FixResult, FixStatus};
use tsfix_types::run::RunResult;

pub const LAST_OUTPUT_FILE: &str = "last-checker-output.txt";
pub const SUMMARY_JSON_FILE: &str = "run-summary.json";
pub const SUMMARY_MD_FILE: &str = "run-summary.md";
pub const PATCH_FILE: &str = "patch.diff";

/// Error type for pipeline results.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("type checker could not be started: {0}")]
    CheckerUnavailable(String),
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Outcome of `run_resolve`.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    pub run: RunResult,
    /// Unified diff of every change, in processing order.
    pub patch: String,
    /// Output of the most recent checker invocation.
    pub last_output: String,
}

/// Run one resolve-and-verify cycle.
///
/// A checker that cannot be spawned is a hard error. A checker that times out is treated as
/// having reported nothing.
pub async fn run_resolve<C: Checker>(
    settings: &ResolveSettings,
    checker: &C,
    source: &dyn SourceView,
) -> Result<ResolveOutcome, ToolError> {
    let project_dir = settings.project_dir.as_path();
    let mut run = RunResult::new(project_dir.to_path_buf(), settings.dry_run);

    let first = invoke(checker).await?;
    let diagnostics = parse_all(&first.output, project_dir);
    run.detected = diagnostics.len() as u64;
    info!(detected = run.detected, "checker run complete");

    if diagnostics.is_empty() {
        run.success = true;
        run.ended_at = Some(Utc::now());
        return Ok(ResolveOutcome {
            run,
            patch: String::new(),
            last_output: first.output,
        });
    }

    let exclude = compile_patterns(&settings.exclude)?;
    let dispatcher = Dispatcher::builtin();
    let opts = EditOptions {
        dry_run: settings.dry_run,
    };

    let mut shifts = LineShifts::default();
    let mut patch = String::new();
    for d in &diagnostics {
        let result = if settings.disabled_codes.iter().any(|c| c == &d.code) {
            FixResult::skipped(d, "code disabled by configuration")
        } else if is_excluded(&exclude, project_dir, &d.file_path) {
            FixResult::skipped(d, "file excluded by configuration")
        } else {
            match shifts.current_line(&d.file_path, d.line) {
                None => FixResult::skipped(d, "line already removed by an earlier fix"),
                Some(line) => match fix_one(&dispatcher, source, d, line, &opts) {
                    Ok((result, diff)) => {
                        patch.push_str(&diff);
                        if result.status == FixStatus::Applied && result.removed_line() {
                            shifts.record_removal(&d.file_path, d.line);
                        }
                        result
                    }
                    Err(e) => {
                        let reason = format!("{e:#}");
                        warn!(diagnostic = %d, error = %reason, "could not fix diagnostic");
                        FixResult::failed(d, reason)
                    }
                },
            }
        };
        debug!(file = %d.file_path, line = d.line, code = %d.code, status = ?result.status, "fix attempted");
        run.results.push(result);
    }
    run.applied = run.results.iter().filter(|r| r.fixed()).count() as u64;

    let last_output = if settings.dry_run {
        let previewed = run
            .results
            .iter()
            .filter(|r| r.status == FixStatus::Previewed)
            .count() as u64;
        run.remaining = run.detected.saturating_sub(previewed);
        first.output
    } else {
        let verify = invoke(checker).await?;
        let remaining = parse_all(&verify.output, project_dir);
        run.remaining = remaining.len() as u64;
        let (persisting, introduced) = compare_identities(&diagnostics, &remaining);
        run.persisting = persisting;
        run.introduced = introduced;
        run.still_failing = remaining;
        verify.output
    };

    run.fixed_count = run.detected as i64 - run.remaining as i64;
    run.success = run.fixed_count > 0;
    run.ended_at = Some(Utc::now());
    info!(
        detected = run.detected,
        applied = run.applied,
        remaining = run.remaining,
        success = run.success,
        "resolve cycle complete"
    );

    Ok(ResolveOutcome {
        run,
        patch,
        last_output,
    })
}

async fn invoke<C: Checker>(checker: &C) -> Result<CheckerRun, ToolError> {
    let run = checker.check().await;
    match &run.status {
        CheckerStatus::SpawnFailed(msg) => Err(ToolError::CheckerUnavailable(msg.clone())),
        CheckerStatus::TimedOut => {
            warn!("checker timed out; treating as no diagnostics");
            Ok(run)
        }
        CheckerStatus::Exited(_) => Ok(run),
    }
}

fn fix_one(
    dispatcher: &Dispatcher,
    source: &dyn SourceView,
    d: &Diagnostic,
    line: u32,
    opts: &EditOptions,
) -> anyhow::Result<(FixResult, String)> {
    match dispatcher.propose(source, d, line)? {
        Proposal::Unfixable {
            reason,
            original_line,
        } => {
            let mut result = FixResult::unsupported(d, reason);
            if let Some(l) = original_line {
                result = result.with_original_line(l);
            }
            Ok((result, String::new()))
        }
        Proposal::Change(change) => {
            debug_assert!(!matches!(change.outcome, FixOutcome::NoChange { .. }));
            let edit = apply_line_fix(
                &d.file_path,
                change.content,
                change.line_index,
                &change.outcome,
                opts,
            )
            .with_context(|| format!("apply fix to {}:{}", d.file_path, d.line))?;
            Ok((
                FixResult::changed(d, &change.original_line, &change.outcome, edit.written),
                edit.patch,
            ))
        }
    }
}

/// Tracks lines deleted per file so later diagnostics, numbered against the original file,
/// still land on the right line.
#[derive(Debug, Default)]
struct LineShifts {
    removed: BTreeMap<Utf8PathBuf, Vec<u32>>,
}

impl LineShifts {
    /// Current line number for an original line, or `None` if that line is gone.
    fn current_line(&self, path: &Utf8Path, original: u32) -> Option<u32> {
        let Some(removed) = self.removed.get(path) else {
            return Some(original);
        };
        if removed.contains(&original) {
            return None;
        }
        let above = removed.iter().filter(|l| **l < original).count() as u32;
        Some(original - above)
    }

    fn record_removal(&mut self, path: &Utf8Path, original: u32) {
        self.removed
            .entry(path.to_path_buf())
            .or_default()
            .push(original);
    }
}

fn compile_patterns(patterns: &[String]) -> anyhow::Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid exclude pattern '{}'", p)))
        .collect()
}

fn is_excluded(patterns: &[Pattern], project_dir: &Utf8Path, path: &Utf8Path) -> bool {
    let rel = path.strip_prefix(project_dir).unwrap_or(path);
    let rel = rel.as_str().replace('\\', "/");
    patterns.iter().any(|p| p.matches(&rel))
}

/// `(persisting, introduced)` counts of `after` against `before`, matched by identity.
fn compare_identities(before: &[Diagnostic], after: &[Diagnostic]) -> (u64, u64) {
    let mut pool: BTreeMap<DiagnosticIdentity, usize> = BTreeMap::new();
    for d in before {
        *pool.entry(d.identity()).or_default() += 1;
    }
    let mut persisting = 0;
    let mut introduced = 0;
    for d in after {
        match pool.get_mut(&d.identity()) {
            Some(n) if *n > 0 => {
                *n -= 1;
                persisting += 1;
            }
            _ => introduced += 1,
        }
    }
    (persisting, introduced)
}

/// Write the checker dump, run summaries and patch into `dir`.
pub fn write_resolve_artifacts(
    outcome: &ResolveOutcome,
    dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(dir)?;

    writer.write_file(&dir.join(LAST_OUTPUT_FILE), outcome.last_output.as_bytes())?;

    let json = serde_json::to_string_pretty(&outcome.run).context("serialize run summary")?;
    writer.write_file(&dir.join(SUMMARY_JSON_FILE), json.as_bytes())?;

    let md = render_run_md(&outcome.run);
    writer.write_file(&dir.join(SUMMARY_MD_FILE), md.as_bytes())?;

    if !outcome.patch.is_empty() {
        writer.write_file(&dir.join(PATCH_FILE), outcome.patch.as_bytes())?;
    }
    Ok(())
}
