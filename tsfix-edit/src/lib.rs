//! Edit engine for single-line fixes.
//!
//! Responsibilities:
//! - Compute a file's new content from a line outcome, entirely in memory.
//! - Check the file is still what the change was computed from (sha256).
//! - Write through a temp file in the same directory and rename it over the original, so no
//!   partially written file is ever visible.
//! - Render a unified diff preview.

mod error;

pub use error::{EditError, EditResult};

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use fs_err as fs;
use sha2::{Digest, Sha256};
use std::io::Write;
use tracing::debug;
use tsfix_types::fix::FixOutcome;

#[derive(Debug, Clone, Default)]
pub struct EditOptions {
    /// Compute and report changes without touching disk.
    pub dry_run: bool,
}

/// Record of one file rewrite (or would-be rewrite in dry-run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    pub path: Utf8PathBuf,
    pub before_sha256: String,
    pub after_sha256: String,
    pub before_bytes: u64,
    pub after_bytes: u64,
    pub written: bool,
    pub patch: String,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// New file content with the line at `line_index` replaced or removed.
///
/// Lines are split on `\n` only; a `\r` stays attached to its line, so CRLF files round-trip.
pub fn apply_outcome(content: &str, line_index: usize, outcome: &FixOutcome) -> EditResult<String> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if line_index >= lines.len() {
        return Err(EditError::LineOutOfRange {
            line: line_index + 1,
            len: lines.len(),
        });
    }

    match outcome {
        FixOutcome::NoChange { reason } => {
            return Err(EditError::NoChange {
                reason: reason.clone(),
            });
        }
        FixOutcome::ReplaceLine(text) => lines[line_index] = text.as_str(),
        FixOutcome::DeleteLine => {
            lines.remove(line_index);
        }
    }
    Ok(lines.join("\n"))
}

/// Replace `path` with `contents` via temp file + rename in the same directory.
///
/// The original file's permissions are carried over when it exists.
pub fn write_atomic(path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_str().is_empty() => p.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".tsfix-")
        .suffix(".tmp")
        .tempfile_in(&dir)
        .with_context(|| format!("create temp file in {}", dir))?;
    tmp.write_all(contents)
        .with_context(|| format!("write temp file for {}", path))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync temp file for {}", path))?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .with_context(|| format!("copy permissions of {}", path))?;
    }

    tmp.persist(path)
        .map_err(|e| anyhow::Error::new(e.error))
        .with_context(|| format!("rename temp file over {}", path))?;
    debug!(path = %path, bytes = contents.len(), "wrote file atomically");
    Ok(())
}

/// Scoped write transaction over one file.
///
/// `begin` snapshots the content and its hash; `commit` refuses to write if the file changed in
/// between, then swaps the new content in atomically. Dropping an uncommitted transaction leaves
/// the file untouched.
#[derive(Debug)]
pub struct EditTransaction {
    path: Utf8PathBuf,
    before: String,
    before_sha256: String,
}

impl EditTransaction {
    pub fn begin(path: &Utf8Path) -> EditResult<Self> {
        let before = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
        Ok(Self::from_snapshot(path, before))
    }

    /// Start from content the caller already read.
    pub fn from_snapshot(path: &Utf8Path, before: String) -> Self {
        let before_sha256 = sha256_hex(before.as_bytes());
        Self {
            path: path.to_path_buf(),
            before,
            before_sha256,
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn before(&self) -> &str {
        &self.before
    }

    pub fn commit(self, after: &str, opts: &EditOptions) -> EditResult<FileEdit> {
        let patch = render_patch(&self.path, &self.before, after);
        let after_sha256 = sha256_hex(after.as_bytes());

        if !opts.dry_run {
            let on_disk = fs::read(&self.path).with_context(|| format!("read {}", self.path))?;
            let actual = sha256_hex(&on_disk);
            if actual != self.before_sha256 {
                return Err(EditError::Conflict {
                    path: self.path,
                    expected: self.before_sha256,
                    actual,
                });
            }
            write_atomic(&self.path, after.as_bytes())?;
        }

        Ok(FileEdit {
            before_bytes: self.before.len() as u64,
            after_bytes: after.len() as u64,
            before_sha256: self.before_sha256,
            after_sha256,
            written: !opts.dry_run,
            patch,
            path: self.path,
        })
    }
}

/// Apply one line outcome to `path`, whose content was read as `before`.
pub fn apply_line_fix(
    path: &Utf8Path,
    before: String,
    line_index: usize,
    outcome: &FixOutcome,
    opts: &EditOptions,
) -> EditResult<FileEdit> {
    let after = apply_outcome(&before, line_index, outcome)?;
    EditTransaction::from_snapshot(path, before).commit(&after, opts)
}

pub fn render_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));
    let patch = diffy::create_patch(before, after);
    let formatted = PatchFormatter::new().fmt_patch(&patch).to_string();
    // diffy repeats its own ---/+++ header; keep only the hunks.
    let hunks = formatted
        .find("@@")
        .map(|i| &formatted[i..])
        .unwrap_or(formatted.as_str());
    out.push_str(hunks);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replace_keeps_other_lines() {
        let out = apply_outcome("a\nb\nc\n", 1, &FixOutcome::ReplaceLine("B".into()))
            .expect("apply");
        assert_eq!(out, "a\nB\nc\n");
    }

    #[test]
    fn delete_removes_exactly_one_line() {
        let out = apply_outcome("a\nb\nc", 0, &FixOutcome::DeleteLine).expect("apply");
        assert_eq!(out, "b\nc");
    }

    #[test]
    fn out_of_range_and_no_change_are_errors() {
        let err = apply_outcome("a", 3, &FixOutcome::DeleteLine).unwrap_err();
        assert!(matches!(err, EditError::LineOutOfRange { line: 4, len: 1 }));

        let err = apply_outcome("a", 0, &FixOutcome::no_change("nope")).unwrap_err();
        assert!(matches!(err, EditError::NoChange { .. }));
    }

    #[test]
    fn patch_is_empty_for_identical_content() {
        assert_eq!(render_patch(Utf8Path::new("a.ts"), "x\n", "x\n"), "");
    }

    #[test]
    fn patch_shows_hunk() {
        let patch = render_patch(Utf8Path::new("a.ts"), "let x = 1\n", "// let x = 1\n");
        assert!(patch.starts_with("--- a/a.ts\n+++ b/a.ts\n@@"));
        assert!(patch.contains("-let x = 1"));
        assert!(patch.contains("+// let x = 1"));
    }
}
