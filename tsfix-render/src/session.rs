use tsfix_types::run::RunSummary;

/// Inputs for the end-of-session report printed by the stop hook.
#[derive(Debug, Clone)]
pub struct SessionReport<'a> {
    pub project: &'a str,
    pub finished_at: &'a str,
    pub session_cache: &'a str,
    pub outcome: Result<&'a RunSummary, &'a str>,
}

pub fn render_session_report(report: &SessionReport<'_>) -> String {
    let mut out = String::new();
    out.push_str("tsfix session report\n");
    out.push_str("--------------------\n");
    out.push_str(&format!("Project:       {}\n", report.project));
    out.push_str(&format!("Finished:      {}\n", report.finished_at));
    out.push_str(&format!("Session cache: {}\n\n", report.session_cache));

    match report.outcome {
        Err(error) => {
            out.push_str("Status:        failed\n");
            out.push_str(&format!("Error:         {error}\n"));
            out.push_str("\nNext steps:\n");
            out.push_str("  - check the [checker] section of tsfix.toml\n");
            out.push_str("  - run `tsfix resolve -v` to see the checker invocation\n");
        }
        Ok(summary) => {
            let status = if summary.success {
                "improved"
            } else {
                "no net improvement"
            };
            out.push_str(&format!("Status:        {status}\n"));
            out.push_str(&format!("Fixed:         {}\n", summary.fixed));
            out.push_str(&format!("Remaining:     {}\n", summary.remaining));
            out.push_str("\nNext steps:\n");
            if summary.remaining == 0 {
                out.push_str("  - no type errors left\n");
            } else {
                out.push_str("  - review the remaining errors in run-summary.md\n");
                out.push_str("  - `tsfix explain <code>` shows what each fixer can do\n");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_report() {
        let summary = RunSummary {
            fixed: 2,
            remaining: 1,
            success: true,
        };
        let text = render_session_report(&SessionReport {
            project: "admin-console",
            finished_at: "2026-10-19 10:00:00",
            session_cache: ".tsfix/cache/s1",
            outcome: Ok(&summary),
        });
        assert!(text.starts_with("tsfix session report\n"));
        assert!(text.contains("Project:       admin-console\n"));
        assert!(text.contains("Status:        improved\nFixed:         2\nRemaining:     1\n"));
        assert!(text.contains("run-summary.md"));
    }

    #[test]
    fn clean_and_failed_reports() {
        let clean = RunSummary {
            fixed: 0,
            remaining: 0,
            success: true,
        };
        let text = render_session_report(&SessionReport {
            project: "p",
            finished_at: "t",
            session_cache: "c",
            outcome: Ok(&clean),
        });
        assert!(text.ends_with("Next steps:\n  - no type errors left\n"));

        let failed = render_session_report(&SessionReport {
            project: "p",
            finished_at: "t",
            session_cache: "c",
            outcome: Err("checker not found"),
        });
        assert_eq!(
            failed.lines().filter(|l| l.starts_with("Status:")).collect::<Vec<_>>(),
            vec!["Status:        failed"]
        );
        assert!(failed.contains("Error:         checker not found\n"));
    }
}
