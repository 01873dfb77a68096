//! BDD harness (cucumber-rs).
//!
//! Scenario steps live in `tests/cucumber.rs`; this crate only provides the fixture helpers they
//! share.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tempfile::TempDir;

/// Scratch project directory that lives as long as the returned guard.
pub fn scratch_project() -> anyhow::Result<(TempDir, Utf8PathBuf)> {
    let td = tempfile::tempdir().context("create temp project")?;
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf())
        .map_err(|p| anyhow::anyhow!("temp dir is not UTF-8: {}", p.display()))?;
    Ok((td, root))
}

/// Write `contents` to `rel` under `root`, creating parent directories.
pub fn write_source(root: &Utf8Path, rel: &str, contents: &str) -> anyhow::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok(())
}

/// 1-based line of a project file.
pub fn source_line(root: &Utf8Path, rel: &str, line: usize) -> anyhow::Result<Option<String>> {
    let text = fs::read_to_string(root.join(rel))?;
    Ok(text.lines().nth(line.saturating_sub(1)).map(str::to_string))
}
