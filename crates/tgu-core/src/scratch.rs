use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{domain::UserId, Result};

static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// A per-request staging directory for one downloaded attachment.
///
/// Named `<user>_<unix_millis>_<seq>` under the scratch root. Dropping the guard removes
/// the files inside and then the directory itself, on success and failure alike.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn create(root: &Path, user: UserId) -> Result<Self> {
        let ts = chrono::Utc::now().timestamp_millis();
        let n = SCRATCH_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = root.join(format!("{}_{ts}_{n}", user.0));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file staged inside this directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    fn cleanup(&self) -> std::io::Result<()> {
        match fs::read_dir(&self.path) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let p = entry.path();
                    if p.is_dir() {
                        fs::remove_dir_all(&p)?;
                    } else {
                        fs::remove_file(&p)?;
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        }
        fs::remove_dir(&self.path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            tracing::warn!(path = %self.path.display(), "scratch cleanup failed: {e}");
        }
    }
}
