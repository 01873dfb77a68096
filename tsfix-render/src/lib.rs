//! Rendering helpers for human-readable run output.

mod session;

pub use session::{SessionReport, render_session_report};

use camino::Utf8Path;
use tsfix_types::fix::{FixResult, FixStatus};
use tsfix_types::run::RunResult;

/// Plain-text report for the terminal (written to stderr by the CLI).
pub fn render_run_text(run: &RunResult) -> String {
    let mut out = String::new();
    out.push_str("TypeScript auto-fix report\n");
    out.push_str("==========================\n");

    if run.detected == 0 {
        out.push_str("No type errors found.\n");
        return out;
    }

    out.push_str(&format!("Detected:  {}\n", run.detected));
    let applied_label = if run.dry_run { "Previewed" } else { "Applied" };
    let applied = if run.dry_run {
        count(run, FixStatus::Previewed)
    } else {
        run.applied
    };
    out.push_str(&format!("{applied_label}:   {applied}\n"));
    out.push_str(&format!("Remaining: {}\n", run.remaining));
    out.push_str(&format!("Net fixed: {}\n", run.fixed_count));
    if run.introduced > 0 {
        out.push_str(&format!(
            "Warning: {} diagnostic(s) appeared that were not there before\n",
            run.introduced
        ));
    }

    let changed: Vec<&FixResult> = run
        .results
        .iter()
        .filter(|r| matches!(r.status, FixStatus::Applied | FixStatus::Previewed))
        .collect();
    if !changed.is_empty() {
        out.push_str(&format!("\n{}:\n", if run.dry_run { "Would fix" } else { "Fixed" }));
        for r in changed {
            out.push_str(&format!(
                "  {}:{} TS{}\n",
                rel(&run.project_dir, &r.file_path),
                r.line,
                r.code
            ));
            if let Some(before) = &r.original_line {
                out.push_str(&format!("    - {}\n", before.trim()));
            }
            if let Some(after) = &r.fixed_line {
                out.push_str(&format!("    + {}\n", after.trim()));
            }
        }
    }

    let unresolved: Vec<&FixResult> = run
        .results
        .iter()
        .filter(|r| !matches!(r.status, FixStatus::Applied | FixStatus::Previewed))
        .collect();
    if !unresolved.is_empty() {
        out.push_str("\nNot fixed:\n");
        for r in unresolved {
            out.push_str(&format!(
                "  {}:{} TS{} [{}] {}\n",
                rel(&run.project_dir, &r.file_path),
                r.line,
                r.code,
                status_label(r.status),
                r.reason.as_deref().unwrap_or("-")
            ));
        }
    }

    if !run.still_failing.is_empty() {
        out.push_str("\nStill failing after re-check:\n");
        for d in &run.still_failing {
            out.push_str(&format!(
                "  {}:{} TS{} {}\n",
                rel(&run.project_dir, &d.file_path),
                d.line,
                d.code,
                d.message
            ));
        }
    }

    out.push_str(&format!(
        "\nResult: {}\n",
        if run.success { "improved" } else { "no net improvement" }
    ));
    out
}

/// Markdown summary stored next to `run-summary.json` in the session cache.
pub fn render_run_md(run: &RunResult) -> String {
    let mut out = String::new();
    out.push_str("# tsfix run\n\n");
    out.push_str(&format!("- Run: `{}`\n", run.run_id));
    out.push_str(&format!("- Started: {}\n", run.started_at.to_rfc3339()));
    if let Some(ended) = run.ended_at {
        out.push_str(&format!("- Ended: {}\n", ended.to_rfc3339()));
    }
    out.push_str(&format!("- Dry run: `{}`\n", run.dry_run));
    out.push_str(&format!(
        "- Detected {} / applied {} / remaining {} / net {}\n",
        run.detected, run.applied, run.remaining, run.fixed_count
    ));
    out.push_str(&format!(
        "- Persisting {} / introduced {}\n",
        run.persisting, run.introduced
    ));
    out.push_str(&format!("- Success: `{}`\n\n", run.success));

    out.push_str("## Results\n\n");
    if run.results.is_empty() {
        out.push_str("_No diagnostics._\n");
        return out;
    }

    out.push_str("| File | Line | Code | Status | Detail |\n");
    out.push_str("|---|---:|---|---|---|\n");
    for r in &run.results {
        let detail = match (&r.reason, &r.fixed_line) {
            (Some(reason), _) => reason.clone(),
            (None, Some(fixed)) => format!("`{}`", fixed.trim().replace('|', "\\|")),
            (None, None) => String::new(),
        };
        out.push_str(&format!(
            "| `{}` | {} | TS{} | {} | {} |\n",
            rel(&run.project_dir, &r.file_path),
            r.line,
            r.code,
            status_label(r.status),
            detail
        ));
    }

    if !run.still_failing.is_empty() {
        out.push_str("\n## Still failing\n\n");
        for d in &run.still_failing {
            out.push_str(&format!(
                "- `{}:{}` TS{}: {}\n",
                rel(&run.project_dir, &d.file_path),
                d.line,
                d.code,
                d.message
            ));
        }
    }
    out
}

pub fn status_label(status: FixStatus) -> &'static str {
    match status {
        FixStatus::Applied => "applied",
        FixStatus::Previewed => "previewed",
        FixStatus::Unsupported => "unsupported",
        FixStatus::Failed => "failed",
        FixStatus::Skipped => "skipped",
    }
}

fn count(run: &RunResult, status: FixStatus) -> u64 {
    run.results.iter().filter(|r| r.status == status).count() as u64
}

fn rel<'a>(root: &Utf8Path, path: &'a Utf8Path) -> &'a str {
    path.strip_prefix(root).unwrap_or(path).as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tsfix_types::diagnostic::Diagnostic;
    use tsfix_types::fix::FixOutcome;

    fn diag(line: u32, code: &str) -> Diagnostic {
        Diagnostic {
            file_path: "/p/src/a.ts".into(),
            line,
            column: 1,
            code: code.into(),
            message: "m".into(),
            raw: String::new(),
        }
    }

    fn sample_run() -> RunResult {
        let mut run = RunResult::new("/p".into(), false);
        run.detected = 2;
        run.applied = 1;
        run.remaining = 1;
        run.fixed_count = 1;
        run.persisting = 1;
        run.success = true;
        run.results = vec![
            FixResult::changed(&diag(1, "6133"), "let x = 1", &FixOutcome::DeleteLine, true),
            FixResult::unsupported(&diag(4, "2322"), "type mismatch needs manual review"),
        ];
        run.still_failing = vec![Diagnostic {
            line: 3,
            message: "Type 'string' is not assignable to type 'number'.".into(),
            ..diag(3, "2322")
        }];
        run
    }

    #[test]
    fn empty_run_text() {
        let run = RunResult::new("/p".into(), false);
        assert_eq!(
            render_run_text(&run),
            "TypeScript auto-fix report\n==========================\nNo type errors found.\n"
        );
    }

    #[test]
    fn text_lists_fixed_and_unresolved_relative_to_project() {
        let text = render_run_text(&sample_run());
        assert!(text.contains("Detected:  2\n"));
        assert!(text.contains("Fixed:\n  src/a.ts:1 TS6133\n    - let x = 1\n    + [LINE REMOVED]\n"));
        assert!(text.contains(
            "Not fixed:\n  src/a.ts:4 TS2322 [unsupported] type mismatch needs manual review\n"
        ));
        assert!(text.contains(
            "Still failing after re-check:\n  src/a.ts:3 TS2322 Type 'string' is not assignable to type 'number'.\n"
        ));
        assert!(text.ends_with("Result: improved\n"));
    }

    #[test]
    fn markdown_has_a_row_per_result() {
        let md = render_run_md(&sample_run());
        assert!(md.starts_with("# tsfix run\n"));
        assert!(md.contains("| `src/a.ts` | 1 | TS6133 | applied | `[LINE REMOVED]` |\n"));
        assert!(md.contains("| `src/a.ts` | 4 | TS2322 | unsupported | type mismatch needs manual review |\n"));
        assert!(md.ends_with(
            "## Still failing\n\n- `src/a.ts:3` TS2322: Type 'string' is not assignable to type 'number'.\n"
        ));
    }
}
