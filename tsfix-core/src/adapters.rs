//! Default port implementations.

use crate::ports::{Checker, CheckerRun, CheckerStatus, WritePort};
use crate::settings::CheckerSettings;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, VecDeque};
use std::process::Stdio;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Runs the checker as a child process in the project directory.
#[derive(Debug, Clone)]
pub struct ProcessChecker {
    pub settings: CheckerSettings,
    pub project_dir: Utf8PathBuf,
}

impl ProcessChecker {
    pub fn new(settings: CheckerSettings, project_dir: Utf8PathBuf) -> Self {
        Self {
            settings,
            project_dir,
        }
    }
}

impl Checker for ProcessChecker {
    async fn check(&self) -> CheckerRun {
        let mut cmd = tokio::process::Command::new(&self.settings.program);
        cmd.args(&self.settings.args)
            .current_dir(&self.project_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(
            command = %self.settings.command_line(),
            dir = %self.project_dir,
            "running checker"
        );
        match tokio::time::timeout(self.settings.timeout, cmd.output()).await {
            Err(_) => {
                warn!(
                    timeout_secs = self.settings.timeout.as_secs(),
                    "checker timed out"
                );
                CheckerRun {
                    status: CheckerStatus::TimedOut,
                    output: String::new(),
                }
            }
            Ok(Err(e)) => CheckerRun {
                status: CheckerStatus::SpawnFailed(format!(
                    "{}: {}",
                    self.settings.program, e
                )),
                output: String::new(),
            },
            Ok(Ok(out)) => {
                let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
                output.push_str(&String::from_utf8_lossy(&out.stderr));
                debug!(code = ?out.status.code(), bytes = output.len(), "checker finished");
                CheckerRun {
                    status: CheckerStatus::Exited(out.status.code()),
                    output,
                }
            }
        }
    }
}

/// Replays canned checker runs in order; the last one repeats once the script is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedChecker {
    runs: Mutex<VecDeque<CheckerRun>>,
    last: Mutex<Option<CheckerRun>>,
    calls: Mutex<usize>,
}

impl ScriptedChecker {
    pub fn new(runs: impl IntoIterator<Item = CheckerRun>) -> Self {
        Self {
            runs: Mutex::new(runs.into_iter().collect()),
            last: Mutex::new(None),
            calls: Mutex::new(0),
        }
    }

    /// Each string becomes a run that exited with code 2 (or 0 when empty).
    pub fn from_outputs<S: Into<String>>(outputs: impl IntoIterator<Item = S>) -> Self {
        Self::new(outputs.into_iter().map(|o| {
            let o = o.into();
            let code = if o.trim().is_empty() { 0 } else { 2 };
            CheckerRun::exited(code, o)
        }))
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Checker for ScriptedChecker {
    async fn check(&self) -> CheckerRun {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        let next = self
            .runs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        match next {
            Some(run) => {
                *last = Some(run.clone());
                run
            }
            None => last
                .clone()
                .unwrap_or_else(|| CheckerRun::exited(0, String::new())),
        }
    }
}

/// Filesystem writes; files are replaced atomically.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        tsfix_edit::write_atomic(path, contents)
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

/// Collects writes in memory.
#[derive(Debug, Default)]
pub struct InMemoryWritePort {
    files: Mutex<BTreeMap<Utf8PathBuf, Vec<u8>>>,
}

impl InMemoryWritePort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Utf8Path) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn paths(&self) -> Vec<Utf8PathBuf> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl WritePort for InMemoryWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, _path: &Utf8Path) -> anyhow::Result<()> {
        Ok(())
    }
}
