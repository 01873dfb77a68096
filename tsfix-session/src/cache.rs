use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::Write;
use std::time::SystemTime;

pub const DEFAULT_CACHE_DIR: &str = ".tsfix/cache";
pub const DEFAULT_SESSION: &str = "default";
pub const EDITED_FILES_LOG: &str = "edited-files.log";
pub const AFFECTED_AREAS_FILE: &str = "affected-areas.txt";
pub const COMMANDS_FILE: &str = "commands.txt";

/// Map an arbitrary session id onto a single safe directory name.
pub fn sanitize_session_id(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        DEFAULT_SESSION.to_string()
    } else {
        cleaned
    }
}

/// One line of the edit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedFile {
    pub timestamp_ms: i64,
    pub tool: String,
    pub path: Utf8PathBuf,
}

impl EditedFile {
    fn parse(line: &str) -> Option<Self> {
        let mut fields = line.splitn(3, '\t');
        let timestamp_ms = fields.next()?.trim().parse().ok()?;
        let tool = fields.next()?.to_string();
        let path = fields.next()?.trim_end();
        if path.is_empty() {
            return None;
        }
        Some(Self {
            timestamp_ms,
            tool,
            path: Utf8PathBuf::from(path),
        })
    }
}

/// Handle on one session directory under the cache root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCache {
    root: Utf8PathBuf,
    id: String,
}

impl SessionCache {
    pub fn open(root: impl Into<Utf8PathBuf>, id: &str) -> Self {
        Self {
            root: root.into(),
            id: sanitize_session_id(id),
        }
    }

    /// The most recently modified session directory, or `default` when there is none.
    pub fn latest(root: impl Into<Utf8PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        let newest = session_dirs(&root)?.into_iter().next();
        let id = newest.map_or_else(|| DEFAULT_SESSION.to_string(), |(name, _)| name);
        Ok(Self { root, id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn dir(&self) -> Utf8PathBuf {
        self.root.join(&self.id)
    }

    pub fn ensure_dir(&self) -> anyhow::Result<Utf8PathBuf> {
        let dir = self.dir();
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir))?;
        Ok(dir)
    }

    pub fn append_edit(&self, timestamp_ms: i64, tool: &str, path: &Utf8Path) -> anyhow::Result<()> {
        let log = self.dir().join(EDITED_FILES_LOG);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log)?;
        file.write_all(format!("{timestamp_ms}\t{tool}\t{path}\n").as_bytes())
            .with_context(|| format!("append {}", log))?;
        Ok(())
    }

    pub fn edited_files(&self) -> anyhow::Result<Vec<EditedFile>> {
        Ok(self
            .read_lines(EDITED_FILES_LOG)?
            .iter()
            .filter_map(|l| EditedFile::parse(l))
            .collect())
    }

    pub fn affected_areas(&self) -> anyhow::Result<Vec<String>> {
        self.read_lines(AFFECTED_AREAS_FILE)
    }

    pub fn commands(&self) -> anyhow::Result<Vec<String>> {
        self.read_lines(COMMANDS_FILE)
    }

    /// Append `entries` not already present; returns how many were new.
    pub fn merge_lines(&self, name: &str, entries: &[String]) -> anyhow::Result<usize> {
        let mut lines = self.read_lines(name)?;
        let before = lines.len();
        for entry in entries {
            if !lines.iter().any(|l| l == entry) {
                lines.push(entry.clone());
            }
        }
        let added = lines.len() - before;
        if added > 0 {
            let mut body = lines.join("\n");
            body.push('\n');
            tsfix_edit::write_atomic(&self.dir().join(name), body.as_bytes())?;
        }
        Ok(added)
    }

    fn read_lines(&self, name: &str) -> anyhow::Result<Vec<String>> {
        let path = self.dir().join(name);
        if !path.is_file() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path).with_context(|| format!("read {}", path))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Session directories under `root`, newest first.
pub(crate) fn session_dirs(root: &Utf8Path) -> anyhow::Result<Vec<(String, SystemTime)>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if !meta.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        dirs.push((name, modified));
    }
    dirs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn session_ids_cannot_escape_the_root() {
        assert_eq!(sanitize_session_id("abc-123"), "abc-123");
        assert_eq!(sanitize_session_id("../../etc"), ".._.._etc");
        assert_eq!(sanitize_session_id(".."), DEFAULT_SESSION);
        assert_eq!(sanitize_session_id("  "), DEFAULT_SESSION);
        assert_eq!(sanitize_session_id("a/b"), "a_b");
    }

    #[test]
    fn edit_log_lines_parse() {
        assert_eq!(
            EditedFile::parse("1700000000000\tEdit\t/p/src/a.ts"),
            Some(EditedFile {
                timestamp_ms: 1_700_000_000_000,
                tool: "Edit".to_string(),
                path: Utf8PathBuf::from("/p/src/a.ts"),
            })
        );
        assert_eq!(EditedFile::parse("garbage"), None);
        assert_eq!(EditedFile::parse("x\tEdit\t/p/a.ts"), None);
        assert_eq!(EditedFile::parse("1\tEdit\t"), None);
    }
}
