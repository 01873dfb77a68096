use crate::fixers::{FixInput, Fixer, UnusedImportFixer, builtin_fixers};
use crate::ports::SourceView;
use crate::symbols::indicates_unused;
use tracing::debug;
use tsfix_types::diagnostic::Diagnostic;
use tsfix_types::fix::FixOutcome;

pub const UNSUPPORTED: &str = "unsupported error type or cannot auto-fix";

/// A computed change for one diagnostic, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    /// Full file content the change applies to.
    pub content: String,
    /// 0-based index into `split_lines(content)`.
    pub line_index: usize,
    pub original_line: String,
    /// Never `NoChange`.
    pub outcome: FixOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    Unfixable {
        reason: String,
        original_line: Option<String>,
    },
    Change(LineChange),
}

/// Split file content on `\n`, keeping any `\r` with its line so a re-join is lossless.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').collect()
}

/// Maps diagnostic codes to strategies.
pub struct Dispatcher {
    fixers: Vec<Box<dyn Fixer>>,
    fallback: Box<dyn Fixer>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Dispatcher {
    pub fn builtin() -> Self {
        Self {
            fixers: builtin_fixers(),
            fallback: Box::new(UnusedImportFixer),
        }
    }

    /// The strategy registered for `code`, if any. Codes are matched without the `TS` prefix.
    pub fn fixer_for(&self, code: &str) -> Option<&dyn Fixer> {
        self.fixers
            .iter()
            .find(|f| f.meta().codes.contains(&code))
            .map(|f| f.as_ref())
    }

    pub fn attempt(&self, code: &str, input: &FixInput<'_>) -> FixOutcome {
        if let Some(fixer) = self.fixer_for(code) {
            debug!(code, fixer = fixer.meta().key, line = input.line, "dispatching");
            return fixer.attempt_fix(input);
        }
        if indicates_unused(input.message) {
            debug!(code, line = input.line, "unknown code, trying unused-binding fallback");
            return self.fallback.attempt_fix(input);
        }
        FixOutcome::no_change(UNSUPPORTED)
    }

    /// Read the diagnostic's file and decide what to do with `line` (1-based).
    ///
    /// `line` is usually `diagnostic.line`; callers pass a shifted value when earlier fixes
    /// removed lines above it.
    pub fn propose(
        &self,
        source: &dyn SourceView,
        diagnostic: &Diagnostic,
        line: u32,
    ) -> anyhow::Result<Proposal> {
        let path = diagnostic.file_path.as_path();
        if !source.exists(path) {
            return Ok(Proposal::Unfixable {
                reason: "file does not exist".to_string(),
                original_line: None,
            });
        }

        let content = source.read_to_string(path)?;
        let lines = split_lines(&content);
        let Some(line_index) = (line as usize).checked_sub(1).filter(|i| *i < lines.len()) else {
            return Ok(Proposal::Unfixable {
                reason: "line out of range".to_string(),
                original_line: None,
            });
        };

        let target = lines[line_index];
        let input = FixInput {
            lines: &lines,
            line,
            column: diagnostic.column,
            target,
            message: &diagnostic.message,
        };

        let outcome = self.attempt(&diagnostic.code, &input);
        if let FixOutcome::NoChange { reason } = outcome {
            return Ok(Proposal::Unfixable {
                reason: if reason.is_empty() {
                    UNSUPPORTED.to_string()
                } else {
                    reason
                },
                original_line: Some(target.to_string()),
            });
        }
        if outcome == FixOutcome::ReplaceLine(target.to_string()) {
            return Ok(Proposal::Unfixable {
                reason: "fix produced an identical line".to_string(),
                original_line: Some(target.to_string()),
            });
        }

        let original_line = target.to_string();
        Ok(Proposal::Change(LineChange {
            content,
            line_index,
            original_line,
            outcome,
        }))
    }
}
