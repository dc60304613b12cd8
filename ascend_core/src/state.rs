//! Profile and plan persistence with file locking.
//!
//! The state file is small and rewritten whole on every change, so writes go
//! through a temp file and an atomic rename.

use crate::{Error, Result, UserState};
use chrono::Utc;
use fs2::FileExt;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

impl UserState {
    /// Load state from a file with shared locking
    ///
    /// Returns default state if the file doesn't exist or can't be read. A
    /// file that fails to parse is moved aside before defaults are returned.
    pub fn load(path: &Path) -> Result<Self> {
        match Self::read_existing(path) {
            Ok(state) => Ok(state.unwrap_or_default()),
            Err(e) => {
                tracing::warn!("Unable to read state file {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Read the state file, `None` when it doesn't exist.
    ///
    /// An unparseable file is renamed to `<name>.corrupt-<timestamp>` and
    /// default state is returned, so a later save never writes over it.
    fn read_existing(path: &Path) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No state file found, using default state");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        match serde_json::from_str::<UserState>(&contents) {
            Ok(state) => {
                tracing::debug!(
                    "Loaded state from {:?} ({} planned exercises)",
                    path,
                    state.plan.len()
                );
                Ok(Some(state))
            }
            Err(e) => {
                let moved = quarantine(path)?;
                tracing::warn!(
                    "Failed to parse state file {:?}: {}. Moved it to {:?}; using defaults.",
                    path,
                    e,
                    moved
                );
                Ok(Some(Self::default()))
            }
        }
    }

    /// Save state with exclusive locking
    ///
    /// Atomically writes state by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("State path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved state to {:?}", path);
        Ok(())
    }

    /// Load state, modify it, and save it back
    ///
    /// Unlike [`Self::load`], a file that exists but can't be read is an
    /// error here rather than a default to save over it.
    pub fn update<F, T>(path: &Path, f: F) -> Result<(Self, T)>
    where
        F: FnOnce(&mut UserState) -> Result<T>,
    {
        let mut state = Self::read_existing(path)?.unwrap_or_default();
        let out = f(&mut state)?;
        state.save(path)?;
        Ok((state, out))
    }
}

/// Rename an unparseable state file out of the way
fn quarantine(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| Error::Other(format!("State path {:?} has no file name", path)))?;
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
    let target = path.with_file_name(format!("{}.corrupt-{}", name.to_string_lossy(), stamp));

    match std::fs::rename(path, &target) {
        Ok(()) => Ok(target),
        // Another process got there first
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(target),
        Err(e) => Err(e.into()),
    }
}
