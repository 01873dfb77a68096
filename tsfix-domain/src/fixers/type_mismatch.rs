use crate::fixers::{FixInput, FixSafety, Fixer, FixerMeta};
use tsfix_types::fix::FixOutcome;

static META: FixerMeta = FixerMeta {
    key: "type-mismatch",
    title: "Type mismatch (report only)",
    codes: &["2322"],
    safety: FixSafety::Manual,
    description: r#"Recognized but never rewritten. An assignment whose type does not match its
target needs a decision about which side is wrong."#,
    remediation: r#"Fix the value or widen the declared type. A cast silences the checker without
fixing the data."#,
};

pub(crate) struct TypeMismatchFixer;

impl Fixer for TypeMismatchFixer {
    fn meta(&self) -> &'static FixerMeta {
        &META
    }

    fn attempt_fix(&self, _input: &FixInput<'_>) -> FixOutcome {
        FixOutcome::no_change("type mismatch needs manual review")
    }
}
