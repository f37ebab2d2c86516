//! # Local State Persistence
//!
//! Saves and restores the cart and wishlist across client restarts.
//!
//! ## What Gets Persisted
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Persisted Snapshot                                   │
//! │                                                                         │
//! │  state.json                                                            │
//! │  ├── cart        full cart with lines and totals                       │
//! │  ├── wishlist    product id list (mirror of the user document)         │
//! │  └── last_uid    who was signed in, for wishlist reconciliation        │
//! │                                                                         │
//! │  NOT persisted: sessions, password material, card data. Signing in     │
//! │  again is always required after a restart.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Platform Paths
//! - **macOS**: `~/Library/Application Support/mn.techmart.store/state.json`
//! - **Windows**: `%APPDATA%\techmart\store\data\state.json`
//! - **Linux**: `~/.local/share/techmartstore/state.json`
//!
//! Set `TECHMART_STATE_PATH` to override.

use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use techmart_core::Cart;

/// Persistence errors. Callers treat these as non-fatal: a failed restore
/// starts with a fresh cart.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no data directory available on this platform")]
    NoDataDir,

    #[error("state I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("state snapshot is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The snapshot written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// The cart as last committed.
    pub cart: Cart,

    /// Wishlisted product ids.
    pub wishlist: Vec<String>,

    /// The uid that owned the wishlist, if anyone was signed in.
    pub last_uid: Option<String>,
}

impl PersistedState {
    /// Loads a snapshot from the given path.
    ///
    /// A missing file yields the default (empty) state; corrupt JSON is
    /// an error so the caller can decide to discard it.
    pub fn load(path: &Path) -> Result<Self, PersistError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let state = serde_json::from_str(&contents)?;
                debug!(path = %path.display(), "Restored persisted state");
                Ok(state)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No persisted state, starting fresh");
                Ok(PersistedState::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the snapshot to the given path, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        debug!(path = %path.display(), "Persisted state saved");
        Ok(())
    }

    /// Loads the snapshot, falling back to empty state on any failure.
    ///
    /// The failure is logged; a broken snapshot never blocks startup.
    pub fn load_or_default(path: &Path) -> Self {
        PersistedState::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Discarding unreadable state snapshot");
            PersistedState::default()
        })
    }
}

/// Determines the snapshot file path.
///
/// `TECHMART_STATE_PATH` overrides the platform data directory.
pub fn default_state_path() -> Result<PathBuf, PersistError> {
    if let Ok(path) = std::env::var("TECHMART_STATE_PATH") {
        return Ok(PathBuf::from(path));
    }

    let dirs = ProjectDirs::from("mn", "techmart", "store").ok_or(PersistError::NoDataDir)?;
    Ok(dirs.data_dir().join("state.json"))
}

// =============================================================================
// Unit Tests
// =============================================================================
