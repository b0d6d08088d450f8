//! engine::lock
//!
//! Exclusive workspace lock for pipeline runs.
//!
//! Two concurrent runs in the same workspace would race on `dist/`, the
//! scratch directory, and the report file. The lock makes the second run
//! fail fast instead.
//!
//! # Storage
//!
//! - `<workspace>/.gantry.lock` - lock file with an OS-level exclusive lock
//!
//! # Invariants
//!
//! - The lock is held for the entire plan execution
//! - The lock is released on drop (RAII); the file itself is kept
//! - Acquisition is non-blocking (fails fast if locked)

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Lock file name, relative to the workspace root.
pub const LOCK_FILE: &str = ".gantry.lock";

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("workspace is locked by another gantry run")]
    AlreadyLocked,

    /// Failed to create or open the lock file.
    #[error("failed to create lock file: {0}")]
    CreateFailed(std::io::Error),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(std::io::Error),
}

/// An exclusive lock on a workspace.
///
/// Released automatically when dropped.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    file: Option<File>,
}

impl RunLock {
    /// Acquire the workspace lock, failing fast if it is already held.
    pub fn acquire(workspace: &Path) -> Result<Self, LockError> {
        let path = workspace.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(LockError::CreateFailed)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                file: Some(file),
            }),
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                Err(LockError::AlreadyLocked)
            }
            Err(err) => Err(LockError::AcquireFailed(err)),
        }
    }

    /// Check whether this guard currently holds the lock.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = fs2::FileExt::unlock(&file);
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        self.release();
    }
}
