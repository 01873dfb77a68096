use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::BTreeMap;

/// Read-only access to the sources being patched.
pub trait SourceView {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String>;

    fn exists(&self, path: &Utf8Path) -> bool;
}

/// File-system backed `SourceView`. Paths are expected to be absolute already.
#[derive(Debug, Clone, Default)]
pub struct FsSourceView;

impl SourceView for FsSourceView {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        fs::read_to_string(path).with_context(|| format!("read {}", path))
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }
}

/// In-memory sources for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemorySourceView {
    files: BTreeMap<Utf8PathBuf, String>,
}

impl InMemorySourceView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl SourceView for InMemorySourceView {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such file: {}", path))
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(path)
    }
}
