//! Stop-hook gating and session housekeeping.

use crate::cache::{SessionCache, session_dirs};
use crate::lock::SessionLock;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::Pattern;
use tracing::{debug, warn};

const TS_EXTENSIONS: &[&str] = &["ts", "tsx", "vue", "js", "jsx"];

pub fn is_typescript_like(path: &Utf8Path) -> bool {
    path.extension().is_some_and(|e| TS_EXTENSIONS.contains(&e))
}

#[derive(Debug, Clone)]
pub struct StopSettings {
    pub enabled: bool,
    pub exclude: Vec<String>,
    pub keep_sessions: usize,
    pub keep_session_cache: bool,
}

impl Default for StopSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            exclude: Vec::new(),
            keep_sessions: 3,
            keep_session_cache: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopDecision {
    Run { files: Vec<Utf8PathBuf> },
    Skip(&'static str),
}

/// Whether the resolver should run for `session`, and on account of which edited files.
pub fn decide(
    session: &SessionCache,
    project_dir: &Utf8Path,
    settings: &StopSettings,
) -> anyhow::Result<StopDecision> {
    if !settings.enabled {
        return Ok(StopDecision::Skip("auto-fix disabled"));
    }
    let edited = session.edited_files()?;
    if edited.is_empty() {
        return Ok(StopDecision::Skip("no modified files"));
    }

    let patterns: Vec<Pattern> = settings
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pat) => Some(pat),
            Err(err) => {
                warn!(pattern = %p, error = %err, "ignoring invalid exclude pattern");
                None
            }
        })
        .collect();

    let mut files: Vec<Utf8PathBuf> = Vec::new();
    for entry in edited {
        if !is_typescript_like(&entry.path) {
            continue;
        }
        let rel = entry
            .path
            .strip_prefix(project_dir)
            .unwrap_or(&entry.path)
            .as_str()
            .replace('\\', "/");
        if patterns.iter().any(|p| p.matches(&rel)) {
            debug!(file = %entry.path, "edited file excluded");
            continue;
        }
        if !files.contains(&entry.path) {
            files.push(entry.path);
        }
    }

    if files.is_empty() {
        Ok(StopDecision::Skip("no TypeScript changes"))
    } else {
        Ok(StopDecision::Run { files })
    }
}

/// Remove all but the newest `keep` session directories, leaving any whose lock is held.
/// Returns the removed session ids.
pub fn cleanup_sessions(cache_root: &Utf8Path, keep: usize) -> anyhow::Result<Vec<String>> {
    let mut removed = Vec::new();
    for (name, _) in session_dirs(cache_root)?.into_iter().skip(keep) {
        let dir = cache_root.join(&name);
        // Held until the directory is gone so a concurrent tracker cannot write into it.
        let Some(_lock) = SessionLock::try_acquire(&dir)? else {
            debug!(session = %name, "session in use, kept");
            continue;
        };
        fs::remove_dir_all(&dir).with_context(|| format!("remove {}", dir))?;
        debug!(session = %name, "old session removed");
        removed.push(name);
    }
    Ok(removed)
}
