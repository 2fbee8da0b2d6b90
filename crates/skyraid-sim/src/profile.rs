//! Selected-profile persistence.
//!
//! One integer index into the player avatar roster survives across
//! sessions. The store itself is an external key-value concern; the
//! engine only sees the `ProfileStore` seam. Absent or out-of-range
//! values fall back to index 0.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use skyraid_core::constants::DEFAULT_PROFILE_INDEX;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile store io: {0}")]
    Io(#[from] io::Error),
    #[error("profile store parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// External key-value store seam for the selected profile index.
pub trait ProfileStore: Send {
    /// Read the persisted index, if any.
    fn load(&self) -> Option<u32>;
    /// Persist a new index.
    fn save(&mut self, index: u32) -> Result<(), ProfileError>;
}

/// Resolve the effective profile index for a roster of `roster_len`
/// entries: persisted value when valid, otherwise the default.
pub fn selected_or_default(store: &dyn ProfileStore, roster_len: usize) -> u32 {
    match store.load() {
        Some(index) if (index as usize) < roster_len => index,
        Some(index) => {
            warn!(index, roster_len, "persisted profile index out of range, using default");
            DEFAULT_PROFILE_INDEX
        }
        None => DEFAULT_PROFILE_INDEX,
    }
}

/// In-memory store for tests and standalone runs.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    selected: Option<u32>,
}

impl MemoryProfileStore {
    pub fn with_selected(index: u32) -> Self {
        Self {
            selected: Some(index),
        }
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Option<u32> {
        self.selected
    }

    fn save(&mut self, index: u32) -> Result<(), ProfileError> {
        self.selected = Some(index);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfileRecord {
    selected_profile: u32,
}

/// JSON-file-backed store for real installs.
#[derive(Debug)]
pub struct JsonFileProfileStore {
    path: PathBuf,
}

impl JsonFileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileStore for JsonFileProfileStore {
    fn load(&self) -> Option<u32> {
        let text = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<ProfileRecord>(&text) {
            Ok(record) => Some(record.selected_profile),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "unreadable profile record, ignoring");
                None
            }
        }
    }

    fn save(&mut self, index: u32) -> Result<(), ProfileError> {
        let record = ProfileRecord {
            selected_profile: index,
        };
        let text = serde_json::to_string_pretty(&record)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
