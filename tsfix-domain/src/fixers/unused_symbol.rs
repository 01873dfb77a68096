use crate::fixers::unused_import::remove_import_binding;
use crate::fixers::{FixInput, FixSafety, Fixer, FixerMeta, indentation};
use crate::symbols;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tsfix_types::fix::FixOutcome;

static DECLARATION_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:const|let|var)\s").expect("declaration pattern compiles")
});

static IMPORT_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*import\s").expect("import pattern compiles"));

static META: FixerMeta = FixerMeta {
    key: "unused-symbol",
    title: "Silence or remove an unused binding",
    codes: &["6133", "6196"],
    safety: FixSafety::Guarded,
    description: r#"Handles a name that is declared but never read. Strategies, first hit wins:

1. Function parameter: rename `x` to `_x` so the checker treats it as intentionally unused.
2. Import specifier: remove it from the import statement (or drop the statement).
3. `const`/`let`/`var` declaration on a single line: comment the line out."#,
    remediation: r#"Commenting out a declaration also drops any side effect of its initializer.
Review the diff; if the initializer must run, keep the call and drop only the binding."#,
};

pub(crate) struct UnusedSymbolFixer;

impl Fixer for UnusedSymbolFixer {
    fn meta(&self) -> &'static FixerMeta {
        &META
    }

    fn attempt_fix(&self, input: &FixInput<'_>) -> FixOutcome {
        let Some(name) = symbols::unused_symbol(input.message) else {
            return FixOutcome::no_change("could not extract symbol name from message");
        };

        // Specifiers inside `{ a, x, b }` look like parameters to the rename pattern.
        if !declares(input.target, name) && !IMPORT_STATEMENT.is_match(input.target) {
            if let Some(line) = prefix_parameter(input.target, name, input.column) {
                return FixOutcome::ReplaceLine(line);
            }
        }

        if let Some(outcome) = remove_import_binding(input.target, name) {
            return outcome;
        }

        if DECLARATION_KEYWORD.is_match(input.target) {
            if !balanced(input.target) {
                return FixOutcome::no_change("declaration spans multiple lines");
            }
            let indent = indentation(input.target);
            return FixOutcome::ReplaceLine(format!(
                "{indent}// {}",
                &input.target[indent.len()..]
            ));
        }

        FixOutcome::no_change(format!("no fix strategy matched unused '{name}'"))
    }
}

/// `(x` / `, x` optionally typed, followed by `,` or `)`: rewrite to `_x`.
fn prefix_parameter(line: &str, name: &str, column: u32) -> Option<String> {
    let escaped = regex::escape(name);
    let re = Regex::new(&format!(
        r"(\(|,\s*)({escaped}\s*:\s*[^,)]+|{escaped})(\s*[,)])"
    ))
    .ok()?;
    let caps = symbols::match_near(&re, line, column, 2)?;
    let whole = caps.get(0)?;
    Some(format!(
        "{}{}{}",
        &line[..whole.start()],
        rename(&caps),
        &line[whole.end()..]
    ))
}

fn rename(caps: &Captures<'_>) -> String {
    format!("{}_{}{}", &caps[1], &caps[2], &caps[3])
}

/// The line itself introduces `name` with `const`/`let`/`var`.
fn declares(line: &str, name: &str) -> bool {
    let escaped = regex::escape(name);
    Regex::new(&format!(
        r"^\s*(?:export\s+)?(?:const|let|var)\s+{escaped}\b"
    ))
    .map(|re| re.is_match(line))
    .unwrap_or(false)
}

fn balanced(line: &str) -> bool {
    let mut depth = 0i32;
    for c in line.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::test_support::input;
    use pretty_assertions::assert_eq;

    const MSG_X: &str = "'x' is declared but its value is never read.";

    fn fix(line: &str, message: &str) -> FixOutcome {
        let lines = [line];
        UnusedSymbolFixer.attempt_fix(&input(&lines, 1, message))
    }

    #[test]
    fn parameter_gets_underscore_prefix() {
        assert_eq!(
            fix("function f(a, x) {", MSG_X),
            FixOutcome::ReplaceLine("function f(a, _x) {".into())
        );
        assert_eq!(
            fix("const cb = (x: number, y) => y", MSG_X),
            FixOutcome::ReplaceLine("const cb = (_x: number, y) => y".into())
        );
    }

    #[test]
    fn parameter_near_column_wins() {
        let lines = ["call(x); handler(x) {"];
        let mut inp = input(&lines, 1, MSG_X);
        inp.column = 18;
        assert_eq!(
            UnusedSymbolFixer.attempt_fix(&inp),
            FixOutcome::ReplaceLine("call(x); handler(_x) {".into())
        );
    }

    #[test]
    fn import_binding_is_removed() {
        assert_eq!(
            fix(
                "import { ref, onMounted } from 'vue'",
                "'onMounted' is declared but its value is never read."
            ),
            FixOutcome::ReplaceLine("import { ref } from 'vue'".into())
        );
    }

    #[test]
    fn middle_import_binding_is_removed_not_renamed() {
        let msg = "'Foo' is declared but its value is never read.";
        assert_eq!(
            fix("import { A, Foo, B } from 'x'", msg),
            FixOutcome::ReplaceLine("import { A, B } from 'x'".into())
        );
        assert_eq!(
            fix("import type { A, Foo, B } from 'x'", msg),
            FixOutcome::ReplaceLine("import type { A, B } from 'x'".into())
        );
    }

    #[test]
    fn declaration_is_commented_out_keeping_indent() {
        assert_eq!(
            fix("    const x = compute(a, b)", MSG_X),
            FixOutcome::ReplaceLine("    // const x = compute(a, b)".into())
        );
    }

    #[test]
    fn declaration_call_args_are_not_parameters() {
        assert_eq!(
            fix("let x = wrap(a, x)", MSG_X),
            FixOutcome::ReplaceLine("// let x = wrap(a, x)".into())
        );
    }

    #[test]
    fn multi_line_declaration_is_left_alone() {
        assert!(!fix("const x = {", MSG_X).is_change());
    }

    #[test]
    fn localized_message_is_understood() {
        assert_eq!(
            fix("let total = 0", "已声明\"total\"，但从未读取其值。"),
            FixOutcome::ReplaceLine("// let total = 0".into())
        );
    }

    #[test]
    fn nothing_to_do() {
        assert!(!fix("return y", MSG_X).is_change());
        assert!(!fix("let x = 1", "Type 'string' is not assignable").is_change());
    }
}
