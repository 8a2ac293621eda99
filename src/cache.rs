//! Numbered on-disk snapshots of every fetched page.
//!
//! Snapshots exist only for post-hoc inspection (`references/1.html`,
//! `references/2.html`, ...). They are never read back by the pipeline.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Default snapshot directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "references";

const SNAPSHOT_EXT: &str = "html";

/// Append-only store of raw page snapshots.
///
/// The slot counter is read from the directory once, when the store is
/// opened, and then kept in memory. Slots are created exclusively, so a slot
/// already taken by another process is skipped rather than overwritten.
#[derive(Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
    next_slot: u64,
}

impl SnapshotStore {
    /// Open (and create if needed) the snapshot directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let next_slot = highest_slot(&dir)? + 1;
        Ok(Self { dir, next_slot })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Slot number the next snapshot will try to use.
    pub fn next_slot(&self) -> u64 {
        self.next_slot
    }

    /// Write `body` to the next free slot and return its path.
    pub fn save(&mut self, body: &str) -> Result<PathBuf> {
        loop {
            let path = self.slot_path(self.next_slot);
            self.next_slot += 1;
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(body.as_bytes())?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn slot_path(&self, slot: u64) -> PathBuf {
        self.dir.join(format!("{}.{}", slot, SNAPSHOT_EXT))
    }
}

/// Largest `<n>.html` slot number in `dir`, or 0 when there is none.
fn highest_slot(dir: &Path) -> Result<u64> {
    let mut highest = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXT) {
            continue;
        }
        if let Some(n) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u64>().ok())
        {
            highest = highest.max(n);
        }
    }
    Ok(highest)
}
