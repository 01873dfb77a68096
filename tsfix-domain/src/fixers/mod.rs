use serde::Serialize;
use tsfix_types::fix::FixOutcome;

mod duplicate_declaration;
mod implicit_any;
mod type_mismatch;
mod unused_import;
mod unused_symbol;

pub(crate) use duplicate_declaration::DuplicateDeclarationFixer;
pub(crate) use implicit_any::ImplicitAnyFixer;
pub(crate) use type_mismatch::TypeMismatchFixer;
pub(crate) use unused_import::UnusedImportFixer;
pub(crate) use unused_symbol::UnusedSymbolFixer;

/// Everything a strategy may look at for one diagnostic.
#[derive(Debug, Clone, Copy)]
pub struct FixInput<'a> {
    /// The whole file, split on `\n`.
    pub lines: &'a [&'a str],
    /// 1-based target line.
    pub line: u32,
    /// 1-based target column as reported by the checker.
    pub column: u32,
    pub target: &'a str,
    pub message: &'a str,
}

/// A single code-keyed rewrite strategy.
///
/// Implementations are pure: they look at text and return an outcome. Nothing here touches disk.
pub trait Fixer: Send + Sync {
    fn meta(&self) -> &'static FixerMeta;

    fn attempt_fix(&self, input: &FixInput<'_>) -> FixOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixSafety {
    /// Purely syntactic; behavior is unchanged.
    Safe,
    /// Usually right, but can drop side effects or shadow names.
    Guarded,
    /// Never applied automatically.
    Manual,
}

impl FixSafety {
    pub fn as_str(self) -> &'static str {
        match self {
            FixSafety::Safe => "safe",
            FixSafety::Guarded => "guarded",
            FixSafety::Manual => "manual",
        }
    }
}

/// Static description of a strategy for `list-fixes` and `explain`.
#[derive(Debug, Clone, Serialize)]
pub struct FixerMeta {
    pub key: &'static str,
    pub title: &'static str,
    pub codes: &'static [&'static str],
    pub safety: FixSafety,
    pub description: &'static str,
    pub remediation: &'static str,
}

pub(crate) fn builtin_fixers() -> Vec<Box<dyn Fixer>> {
    vec![
        Box::new(UnusedSymbolFixer),
        Box::new(UnusedImportFixer),
        Box::new(DuplicateDeclarationFixer),
        Box::new(ImplicitAnyFixer),
        Box::new(TypeMismatchFixer),
    ]
}

pub fn builtin_fixer_metas() -> Vec<&'static FixerMeta> {
    builtin_fixers().iter().map(|f| f.meta()).collect()
}

/// Look a strategy up by key (`unused-symbol`) or by code (`6133` or `TS6133`).
pub fn find_fixer_meta(key_or_code: &str) -> Option<&'static FixerMeta> {
    let needle = key_or_code.trim();
    let code = needle
        .strip_prefix("TS")
        .or_else(|| needle.strip_prefix("ts"))
        .unwrap_or(needle);
    builtin_fixer_metas()
        .into_iter()
        .find(|m| m.key.eq_ignore_ascii_case(needle) || m.codes.contains(&code))
}

/// Leading whitespace of a line.
pub(crate) fn indentation(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::FixInput;

    pub(crate) fn input<'a>(lines: &'a [&'a str], line: u32, message: &'a str) -> FixInput<'a> {
        FixInput {
            lines,
            line,
            column: 1,
            target: lines[(line - 1) as usize],
            message,
        }
    }
}
