use crate::fixers::{FixInput, FixSafety, Fixer, FixerMeta};
use crate::symbols;
use chrono::Utc;
use regex::{NoExpand, Regex};
use std::sync::atomic::{AtomicU64, Ordering};
use tsfix_types::fix::FixOutcome;

static META: FixerMeta = FixerMeta {
    key: "duplicate-declaration",
    title: "Rename a redeclared block-scoped variable",
    codes: &["2451", "2580"],
    safety: FixSafety::Guarded,
    description: r#"Renames every whole-word occurrence of the redeclared name on the reported
line to `<name>_<suffix>`. The suffix is a millisecond timestamp that never repeats within one
process, so running the fix twice on the same line yields two different names."#,
    remediation: r#"Only the reported line is renamed. Later references that meant the second
declaration still point at the first one; rename them by hand or merge the declarations."#,
};

static LAST_SUFFIX: AtomicU64 = AtomicU64::new(0);

/// Current epoch milliseconds, bumped past the last value handed out.
fn next_suffix() -> u64 {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let prev = LAST_SUFFIX
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(prev + 1)
}

pub(crate) struct DuplicateDeclarationFixer;

impl Fixer for DuplicateDeclarationFixer {
    fn meta(&self) -> &'static FixerMeta {
        &META
    }

    fn attempt_fix(&self, input: &FixInput<'_>) -> FixOutcome {
        let Some(name) = symbols::redeclared_symbol(input.message) else {
            return FixOutcome::no_change("could not extract symbol name from message");
        };
        let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(name))) else {
            return FixOutcome::no_change(format!("cannot match identifier '{name}'"));
        };

        let renamed = format!("{name}_{}", next_suffix());
        let fixed = re.replace_all(input.target, NoExpand(&renamed));
        if fixed == input.target {
            return FixOutcome::no_change(format!("'{name}' does not occur on this line"));
        }
        FixOutcome::ReplaceLine(fixed.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::test_support::input;

    const MSG: &str = "Cannot redeclare block-scoped variable 'x'.";

    fn fix(line: &str) -> FixOutcome {
        let lines = [line];
        DuplicateDeclarationFixer.attempt_fix(&input(&lines, 1, MSG))
    }

    fn replaced(outcome: FixOutcome) -> String {
        match outcome {
            FixOutcome::ReplaceLine(s) => s,
            other => panic!("expected replacement, got {other:?}"),
        }
    }

    #[test]
    fn every_whole_word_occurrence_is_renamed() {
        let line = "const x = xs.map(v => x + v.x)";
        let out = replaced(fix(line));
        assert_ne!(out, line);

        let new_name = out
            .strip_prefix("const ")
            .and_then(|s| s.split(' ').next())
            .expect("renamed identifier");
        assert!(new_name.starts_with("x_"));
        assert!(new_name["x_".len()..].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(
            out,
            format!("const {new_name} = xs.map(v => {new_name} + v.{new_name})")
        );
        assert!(out.contains("xs.map"));
    }

    #[test]
    fn reapplying_yields_a_different_name() {
        let line = "let x = 1";
        let a = replaced(fix(line));
        let b = replaced(fix(line));
        assert_ne!(a, line);
        assert_ne!(b, line);
        assert_ne!(a, b);
    }

    #[test]
    fn suffixes_strictly_increase() {
        let a = next_suffix();
        let b = next_suffix();
        assert!(b > a);
    }

    #[test]
    fn absent_name_is_no_change() {
        assert!(!fix("let xs = 1").is_change());
        let lines = ["let x = 1"];
        let out = DuplicateDeclarationFixer.attempt_fix(&input(&lines, 1, "unrelated"));
        assert!(!out.is_change());
    }
}
