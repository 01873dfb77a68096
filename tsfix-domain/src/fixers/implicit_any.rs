use crate::fixers::{FixInput, FixSafety, Fixer, FixerMeta};
use crate::symbols;
use regex::Regex;
use tsfix_types::fix::FixOutcome;

static META: FixerMeta = FixerMeta {
    key: "implicit-any",
    title: "Annotate an implicitly-typed binding",
    codes: &["7005", "7006", "7034"],
    safety: FixSafety::Safe,
    description: r#"Adds an explicit annotation where the checker inferred `any`.

Parameters get `: unknown` (arrow functions with a bare parameter are parenthesized first).
Variables get a type guessed from the name: `id` becomes `string | number`, `count`/`length`
become `number`, `is*`/`has*` become `boolean`, `data`/`items` become `unknown[]`, anything else
becomes `unknown`."#,
    remediation: r#"`unknown` forces narrowing at every use site. Replace it with the real type
once the checker points at those sites."#,
};

pub(crate) struct ImplicitAnyFixer;

impl Fixer for ImplicitAnyFixer {
    fn meta(&self) -> &'static FixerMeta {
        &META
    }

    fn attempt_fix(&self, input: &FixInput<'_>) -> FixOutcome {
        if let Some((name, _)) = symbols::implicit_parameter(input.message) {
            return annotate_parameter(input.target, name, input.column)
                .map(FixOutcome::ReplaceLine)
                .unwrap_or_else(|| {
                    FixOutcome::no_change(format!("parameter '{name}' not found on this line"))
                });
        }

        if let Some((name, implied)) = symbols::implicit_variable(input.message) {
            let ty = if implied.ends_with("[]") {
                "unknown[]"
            } else {
                infer_type(name)
            };
            return annotate_variable(input.target, name, ty)
                .map(FixOutcome::ReplaceLine)
                .unwrap_or_else(|| {
                    FixOutcome::no_change(format!("declaration of '{name}' not found on this line"))
                });
        }

        FixOutcome::no_change("could not extract symbol name from message")
    }
}

fn annotate_parameter(line: &str, name: &str, column: u32) -> Option<String> {
    let escaped = regex::escape(name);

    let listed = Regex::new(&format!(r"\b({escaped})(\s*[),=])")).ok()?;
    if let Some(caps) = symbols::match_near(&listed, line, column, 1) {
        let m = caps.get(1)?;
        let rest = &line[m.end()..];
        // `x => ...` is an arrow, not a default value.
        if !rest.trim_start().starts_with("=>") {
            return Some(format!(
                "{}{name}: unknown{}",
                &line[..m.start()],
                rest
            ));
        }
    }

    let bare_arrow = Regex::new(&format!(r"(^|[^\w$.])({escaped})(\s*=>)")).ok()?;
    let caps = symbols::match_near(&bare_arrow, line, column, 2)?;
    let m = caps.get(2)?;
    Some(format!(
        "{}({name}: unknown){}",
        &line[..m.start()],
        &line[m.end()..]
    ))
}

fn annotate_variable(line: &str, name: &str, ty: &str) -> Option<String> {
    let escaped = regex::escape(name);
    let re = Regex::new(&format!(
        r"\b(?:const|let|var)\s+({escaped})\b(\s*)(=|;|$)"
    ))
    .ok()?;
    let caps = re.captures(line)?;
    let m = caps.get(1)?;
    Some(format!("{}{name}: {ty}{}", &line[..m.start()], &line[m.end()..]))
}

/// Best-effort annotation from a binding's name.
pub(crate) fn infer_type(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    let starts_word = |prefix: &str| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase() || c == '_')
    };

    if lower == "id" || name.ends_with("Id") || lower.ends_with("_id") {
        "string | number"
    } else if lower.contains("count") || lower.contains("length") {
        "number"
    } else if starts_word("is") || starts_word("has") {
        "boolean"
    } else if lower.contains("data") || lower.contains("items") || lower.contains("list") {
        "unknown[]"
    } else {
        "unknown"
    }
}
