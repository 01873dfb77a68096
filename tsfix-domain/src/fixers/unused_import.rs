use crate::fixers::{FixInput, FixSafety, Fixer, FixerMeta};
use crate::symbols;
use regex::Regex;
use std::sync::LazyLock;
use tsfix_types::fix::FixOutcome;

static NAMED_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"import\s*(type\s+)?(?:([A-Za-z_$][\w$]*)\s*,\s*)?\{([^}]*)\}\s*from\s*(['"][^'"]+['"])"#,
    )
    .expect("named import pattern compiles")
});

static SINGLE_BINDING_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*import\s+(?:type\s+)?(?:\*\s+as\s+)?([A-Za-z_$][\w$]*)\s+from\s*['"][^'"]+['"]\s*;?\s*$"#,
    )
    .expect("default import pattern compiles")
});

static WHOLE_IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\b[^'"]*\bfrom\s*['"][^'"]+['"]\s*;?\s*$"#)
        .expect("import line pattern compiles")
});

static META: FixerMeta = FixerMeta {
    key: "unused-import",
    title: "Remove unused import specifier",
    codes: &["6192"],
    safety: FixSafety::Safe,
    description: r#"Removes the unused name from a single-line `import { ... } from '...'`
statement. When it was the only binding the whole import line is deleted; otherwise the
statement is rewritten with the remaining specifiers and the original module string.

Also used as the fallback for any unknown code whose message says a name is never used."#,
    remediation: r#"Multi-line import blocks are left alone. Delete the specifier by hand, or
run your formatter's organize-imports action."#,
};

pub(crate) struct UnusedImportFixer;

impl Fixer for UnusedImportFixer {
    fn meta(&self) -> &'static FixerMeta {
        &META
    }

    fn attempt_fix(&self, input: &FixInput<'_>) -> FixOutcome {
        match symbols::unused_symbol(input.message) {
            Some(name) => remove_import_binding(input.target, name).unwrap_or_else(|| {
                FixOutcome::no_change(format!("no single-line import of '{name}' on this line"))
            }),
            None if input.message.contains("All imports in import declaration are unused")
                && WHOLE_IMPORT_LINE.is_match(input.target) =>
            {
                FixOutcome::DeleteLine
            }
            None => FixOutcome::no_change("could not extract symbol name from message"),
        }
    }
}

/// Drop `name` from the import statement on `line`, or the whole line if nothing is left.
pub(crate) fn remove_import_binding(line: &str, name: &str) -> Option<FixOutcome> {
    if let Some(caps) = SINGLE_BINDING_IMPORT.captures(line) {
        return (caps.get(1)?.as_str() == name).then_some(FixOutcome::DeleteLine);
    }

    let caps = NAMED_IMPORT.captures(line)?;
    let whole = caps.get(0)?;
    let default = caps.get(2).map(|m| m.as_str());
    let specifiers: Vec<&str> = caps
        .get(3)?
        .as_str()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let kept: Vec<&str> = specifiers
        .iter()
        .copied()
        .filter(|s| !binds(s, name))
        .collect();
    let kept_default = default.filter(|d| *d != name);

    if kept.len() == specifiers.len() && kept_default == default {
        return None;
    }
    if kept.is_empty() && kept_default.is_none() {
        return Some(FixOutcome::DeleteLine);
    }

    let mut stmt = String::from("import ");
    if caps.get(1).is_some() {
        stmt.push_str("type ");
    }
    if let Some(d) = kept_default {
        stmt.push_str(d);
        if !kept.is_empty() {
            stmt.push_str(", ");
        }
    }
    if !kept.is_empty() {
        stmt.push_str(&format!("{{ {} }}", kept.join(", ")));
    }
    stmt.push_str(" from ");
    stmt.push_str(caps.get(4)?.as_str());

    Some(FixOutcome::ReplaceLine(format!(
        "{}{}{}",
        &line[..whole.start()],
        stmt,
        &line[whole.end()..]
    )))
}

/// Does one import specifier (`Foo`, `type Foo`, `Foo as Bar`) introduce `name`?
fn binds(specifier: &str, name: &str) -> bool {
    let spec = specifier.strip_prefix("type ").unwrap_or(specifier).trim();
    match spec.split_once(" as ") {
        Some((imported, local)) => imported.trim() == name || local.trim() == name,
        None => spec == name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::test_support::input;
    use pretty_assertions::assert_eq;

    fn run(line: &str, name: &str) -> Option<FixOutcome> {
        remove_import_binding(line, name)
    }

    #[test]
    fn sole_specifier_removes_the_line() {
        assert_eq!(run("import { Foo } from 'x'", "Foo"), Some(FixOutcome::DeleteLine));
        assert_eq!(run("import {Foo} from \"x\";", "Foo"), Some(FixOutcome::DeleteLine));
    }

    #[test]
    fn other_specifiers_are_kept_with_module() {
        assert_eq!(
            run("import { Foo, Bar } from 'x'", "Foo"),
            Some(FixOutcome::ReplaceLine("import { Bar } from 'x'".into()))
        );
        assert_eq!(
            run("import { ref, computed, watch } from \"vue\";", "computed"),
            Some(FixOutcome::ReplaceLine("import { ref, watch } from \"vue\";".into()))
        );
    }

    #[test]
    fn aliased_and_type_specifiers() {
        assert_eq!(
            run("import { a as b, c } from 'm'", "b"),
            Some(FixOutcome::ReplaceLine("import { c } from 'm'".into()))
        );
        assert_eq!(
            run("import type { A, B } from './types'", "B"),
            Some(FixOutcome::ReplaceLine("import type { A } from './types'".into()))
        );
        assert_eq!(
            run("import { type A, B } from './types'", "A"),
            Some(FixOutcome::ReplaceLine("import { B } from './types'".into()))
        );
    }

    #[test]
    fn default_and_namespace_imports() {
        assert_eq!(run("import Vue from 'vue'", "Vue"), Some(FixOutcome::DeleteLine));
        assert_eq!(run("import * as path from 'path';", "path"), Some(FixOutcome::DeleteLine));
        assert_eq!(run("import Vue from 'vue'", "Other"), None);
        assert_eq!(
            run("import Vue, { ref } from 'vue'", "ref"),
            Some(FixOutcome::ReplaceLine("import Vue from 'vue'".into()))
        );
        assert_eq!(
            run("import Vue, { ref } from 'vue'", "Vue"),
            Some(FixOutcome::ReplaceLine("import { ref } from 'vue'".into()))
        );
    }

    #[test]
    fn indentation_and_trailing_text_survive() {
        assert_eq!(
            run("  import { A, B } from 'x' // keep", "A"),
            Some(FixOutcome::ReplaceLine("  import { B } from 'x' // keep".into()))
        );
    }

    #[test]
    fn unrelated_lines_do_not_change() {
        assert_eq!(run("const Foo = 1", "Foo"), None);
        assert_eq!(run("import { Foo } from 'x'", "Bar"), None);
        assert_eq!(run("import {", "Foo"), None);
    }

    #[test]
    fn all_unused_message_deletes_the_import() {
        let lines = ["import { a, b } from 'x';", "run()"];
        let out = UnusedImportFixer.attempt_fix(&input(
            &lines,
            1,
            "All imports in import declaration are unused.",
        ));
        assert_eq!(out, FixOutcome::DeleteLine);
    }

    #[test]
    fn message_without_symbol_is_no_change() {
        let lines = ["const a = 1"];
        let out = UnusedImportFixer.attempt_fix(&input(&lines, 1, "something else"));
        assert!(!out.is_change());
    }
}
