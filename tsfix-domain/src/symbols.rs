//! Symbol-name extraction from checker messages, plus small line-matching helpers.

use regex::{Match, Regex};
use std::sync::LazyLock;

static UNUSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'([^']+)' is (?:declared|defined) but (?:its value is )?never (?:read|used)")
        .expect("unused pattern compiles")
});

// zh-CN checker locale.
static UNUSED_ZH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"已声明[“"「']([^”"」']+)[”"」']，?但从未(?:读取其值|使用)"#)
        .expect("localized unused pattern compiles")
});

static REDECLARED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Cannot redeclare block-scoped variable '([^']+)'")
        .expect("redeclare pattern compiles")
});

static IMPLICIT_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Parameter '([^']+)' implicitly has an? '([^']+)' type")
        .expect("implicit parameter pattern compiles")
});

static IMPLICIT_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Variable '([^']+)' implicitly has (?:an? )?(?:type )?'([^']+)'")
        .expect("implicit variable pattern compiles")
});

/// Name reported as unused, in either supported locale.
pub(crate) fn unused_symbol(message: &str) -> Option<&str> {
    UNUSED
        .captures(message)
        .or_else(|| UNUSED_ZH.captures(message))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub(crate) fn redeclared_symbol(message: &str) -> Option<&str> {
    REDECLARED
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// `(name, implied type)` for an implicitly-typed parameter.
pub(crate) fn implicit_parameter(message: &str) -> Option<(&str, &str)> {
    let caps = IMPLICIT_PARAM.captures(message)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// `(name, implied type)` for an implicitly-typed variable.
pub(crate) fn implicit_variable(message: &str) -> Option<(&str, &str)> {
    let caps = IMPLICIT_VARIABLE.captures(message)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// True when a message describes an unused binding, whatever its code.
pub fn indicates_unused(message: &str) -> bool {
    message.contains("never used")
        || message.contains("never read")
        || message.contains("从未读取")
        || message.contains("从未使用")
}

/// Byte offset of a 1-based column, if it falls inside the line.
pub(crate) fn column_offset(line: &str, column: u32) -> Option<usize> {
    let idx = usize::try_from(column.checked_sub(1)?).ok()?;
    line.char_indices().nth(idx).map(|(offset, _)| offset)
}

/// Pick the match whose span covers the reported column, falling back to the first match.
pub(crate) fn match_near<'h>(
    re: &Regex,
    line: &'h str,
    column: u32,
    group: usize,
) -> Option<regex::Captures<'h>> {
    let at = column_offset(line, column);
    let mut first = None;
    for caps in re.captures_iter(line) {
        let covers = match (at, caps.get(group)) {
            (Some(at), Some(m)) => covers(&m, at),
            _ => false,
        };
        if covers {
            return Some(caps);
        }
        if first.is_none() {
            first = Some(caps);
        }
    }
    first
}

fn covers(m: &Match<'_>, at: usize) -> bool {
    m.start() <= at && at < m.end().max(m.start() + 1)
}
