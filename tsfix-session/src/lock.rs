use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::{ErrorKind, Write};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

const LOCK_FILE: &str = ".lock";
const RETRY_DELAY: Duration = Duration::from_millis(20);
const MAX_ATTEMPTS: u32 = 250;
const STALE_AFTER: Duration = Duration::from_secs(30);

/// Exclusive writer lock on a session directory. Released on drop.
#[derive(Debug)]
pub struct SessionLock {
    path: Utf8PathBuf,
}

impl SessionLock {
    /// Block (bounded) until the session lock is ours.
    pub fn acquire(session_dir: &Utf8Path) -> anyhow::Result<Self> {
        let path = session_dir.join(LOCK_FILE);
        for attempt in 0..MAX_ATTEMPTS {
            if let Some(lock) = Self::open(&path)? {
                debug!(path = %path, attempt, "session lock acquired");
                return Ok(lock);
            }
            thread::sleep(RETRY_DELAY);
        }
        bail!("session is locked by another writer: {}", path)
    }

    /// Single attempt; `None` while another writer holds a fresh lock.
    pub fn try_acquire(session_dir: &Utf8Path) -> anyhow::Result<Option<Self>> {
        Self::open(&session_dir.join(LOCK_FILE))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn open(path: &Utf8Path) -> anyhow::Result<Option<Self>> {
        for _ in 0..2 {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
            {
                Ok(mut file) => {
                    // The pid is informational; a failed write still holds the lock.
                    let _ = writeln!(file, "{}", std::process::id());
                    return Ok(Some(Self {
                        path: path.to_path_buf(),
                    }));
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    if !is_stale(path) {
                        return Ok(None);
                    }
                    warn!(path = %path, "removing stale session lock");
                    let _ = fs::remove_file(path);
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("lock {}", path));
                }
            }
        }
        Ok(None)
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            // The whole session directory went away while locked (cleanup).
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path, error = %err, "failed to release session lock"),
        }
    }
}

fn is_stale(path: &Utf8Path) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| SystemTime::now().duration_since(t).ok())
        .is_some_and(|age| age > STALE_AFTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_is_exclusive_and_released_on_drop() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8");

        let lock = SessionLock::acquire(dir).expect("first acquire");
        assert!(lock.path().is_file());
        let contender = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(lock.path());
        assert!(contender.is_err());

        let path = lock.path().to_path_buf();
        drop(lock);
        assert!(!path.exists());
        let _again = SessionLock::acquire(dir).expect("reacquire");
    }

    #[test]
    fn try_acquire_reports_a_held_lock() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8");

        let held = SessionLock::try_acquire(dir).expect("try").expect("free lock");
        assert!(SessionLock::try_acquire(dir).expect("try").is_none());
        drop(held);
        assert!(SessionLock::try_acquire(dir).expect("try").is_some());
    }

    #[test]
    fn dropping_a_lock_whose_directory_is_gone_is_quiet() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8").join("s1");
        fs::create_dir_all(&dir).expect("mkdir");
        let lock = SessionLock::acquire(&dir).expect("acquire");
        fs::remove_dir_all(&dir).expect("remove");
        drop(lock);
        assert!(!dir.exists());
    }
}
