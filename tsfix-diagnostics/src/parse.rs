use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;
use tsfix_types::diagnostic::Diagnostic;

static DIAGNOSTIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^(]+)\((\d+),(\d+)\):\s*error\s+TS(\d+):\s*(.+)$")
        .expect("diagnostic line pattern compiles")
});

/// Lazy, single-pass sequence of diagnostics over one checker output.
///
/// Re-parsing means re-running the checker; the iterator cannot be rewound.
pub struct Diagnostics<'a> {
    lines: std::str::Lines<'a>,
    project_dir: &'a Utf8Path,
}

impl Iterator for Diagnostics<'_> {
    type Item = Diagnostic;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if let Some(d) = parse_line(line, self.project_dir) {
                return Some(d);
            }
        }
        None
    }
}

/// Parse checker output lazily. Relative file paths are resolved against `project_dir`.
pub fn parse_output<'a>(output: &'a str, project_dir: &'a Utf8Path) -> Diagnostics<'a> {
    Diagnostics {
        lines: output.lines(),
        project_dir,
    }
}

pub fn parse_all(output: &str, project_dir: &Utf8Path) -> Vec<Diagnostic> {
    parse_output(output, project_dir).collect()
}

/// Parse one output line; `None` for anything that is not an error diagnostic.
pub fn parse_line(line: &str, project_dir: &Utf8Path) -> Option<Diagnostic> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Some(caps) = DIAGNOSTIC_LINE.captures(trimmed) else {
        trace!(line = trimmed, "skipping non-diagnostic line");
        return None;
    };

    // Digit runs too long for u32 are not real positions.
    let line_no = caps[2].parse::<u32>().ok()?;
    let column = caps[3].parse::<u32>().ok()?;

    let file = caps[1].trim();
    Some(Diagnostic {
        file_path: project_dir.join(file),
        line: line_no,
        column,
        code: caps[4].to_string(),
        message: caps[5].trim().to_string(),
        raw: trimmed.to_string(),
    })
}

/// Read a saved checker output dump and parse it.
pub fn load_output(path: &Utf8Path, project_dir: &Utf8Path) -> anyhow::Result<Vec<Diagnostic>> {
    let output = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    Ok(parse_all(&output, project_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflowing_line_number_is_dropped() {
        let line = "a.ts(99999999999,1): error TS6133: 'x' is declared but its value is never read.";
        assert!(parse_line(line, Utf8Path::new("/p")).is_none());
    }

    #[test]
    fn warning_lines_are_not_errors() {
        let line = "a.ts(1,1): warning TS6133: something";
        assert!(parse_line(line, Utf8Path::new("/p")).is_none());
    }
}
