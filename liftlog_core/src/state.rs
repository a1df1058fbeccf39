//! Tracker state persistence with file locking.
//!
//! The singleton [`TrackerState`] is stored as one JSON document and
//! replaced atomically on every save.

use crate::store::StateStore;
use crate::{Error, Result, TrackerState};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// JSON-file state store
pub struct JsonStateStore {
    path: PathBuf,
    initial: TrackerState,
}

impl JsonStateStore {
    /// Store at `path`; `initial` is written the first time the state is read
    pub fn new(path: impl Into<PathBuf>, initial: TrackerState) -> Self {
        Self {
            path: path.into(),
            initial,
        }
    }
}

impl StateStore for JsonStateStore {
    fn get_state(&mut self) -> Result<TrackerState> {
        if !self.path.exists() {
            tracing::info!("No state file found, creating default state");
            let state = self.initial.clone();
            save(&self.path, &state)?;
            return Ok(state);
        }

        match load(&self.path) {
            Some(state) => Ok(state),
            None => Ok(self.initial.clone()),
        }
    }

    fn save_state(&mut self, state: &TrackerState) -> Result<()> {
        save(&self.path, state)
    }
}

/// Read the state with a shared lock
///
/// Returns `None` (after logging a warning) if the file cannot be read or
/// parsed, or holds an empty cycle.
fn load(path: &Path) -> Option<TrackerState> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(
                "Unable to open state file {:?}: {}. Using defaults.",
                path,
                e
            );
            return None;
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!(
            "Unable to lock state file {:?}: {}. Using defaults.",
            path,
            e
        );
        return None;
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    let read = reader.read_to_string(&mut contents);
    let _ = file.unlock();
    if let Err(e) = read {
        tracing::warn!(
            "Failed to read state file {:?}: {}. Using defaults.",
            path,
            e
        );
        return None;
    }

    let mut state = match serde_json::from_str::<TrackerState>(&contents) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(
                "Failed to parse state file {:?}: {}. Using defaults.",
                path,
                e
            );
            return None;
        }
    };

    if state.cycle.is_empty() {
        tracing::warn!("State file {:?} has an empty cycle. Using defaults.", path);
        return None;
    }
    state.position %= state.cycle.len();

    tracing::debug!("Loaded tracker state from {:?}", path);
    Some(state)
}

/// Atomically replace the state file
///
/// Writes to a temp file in the same directory under an exclusive lock,
/// syncs it, then renames it over the original.
fn save(path: &Path, state: &TrackerState) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::State(format!("state path {:?} has no parent", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string_pretty(state)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved tracker state to {:?}", path);
    Ok(())
}
