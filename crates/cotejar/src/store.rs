//! Artifact storage: named byte slots for baselines, diffs, and captures
//!
//! The comparator sees storage as a flat key-to-bytes map. Keys are file
//! names, not paths. One check owns three slots, distinguished by a fixed
//! suffix: its baseline, its latest diff artifact, and its latest raw
//! capture.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::result::{CotejoError, CotejoResult};

/// Slot suffix for a check's baseline
pub const BASELINE_SUFFIX: &str = ".baseline.png";

/// Slot suffix for a check's latest diff artifact
pub const DIFF_SUFFIX: &str = ".diff.png";

/// Slot suffix for a check's latest raw capture
pub const ACTUAL_SUFFIX: &str = ".actual.png";

const TMP_SUFFIX: &str = ".tmp";

/// Storage key for a check's baseline slot
#[must_use]
pub fn baseline_key(check_name: &str) -> String {
    format!("{check_name}{BASELINE_SUFFIX}")
}

/// Storage key for a check's diff artifact slot
#[must_use]
pub fn diff_key(check_name: &str) -> String {
    format!("{check_name}{DIFF_SUFFIX}")
}

/// Storage key for a check's latest-capture slot
#[must_use]
pub fn actual_key(check_name: &str) -> String {
    format!("{check_name}{ACTUAL_SUFFIX}")
}

/// Key→bytes slot storage the comparator reads and writes
///
/// Implementations provide their own interior mutability; callers only ever
/// hold shared references. Nothing here coordinates concurrent writers to
/// the same key; callers serialize per check name themselves.
pub trait ArtifactStore {
    /// Bytes stored under `key`, or `None` when the slot is absent
    fn read(&self, key: &str) -> CotejoResult<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous value
    fn write(&self, key: &str, bytes: &[u8]) -> CotejoResult<()>;
}

/// In-memory store for tests and embedded use
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_slots().len()
    }

    /// Whether no slot is occupied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_slots().is_empty()
    }

    /// Whether `key` holds a value
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.read_slots().contains_key(key)
    }

    /// Sorted slot keys currently present
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read_slots().keys().cloned().collect();
        keys.sort();
        keys
    }

    // A poisoned lock only means another thread panicked mid-operation; the
    // map itself is still coherent, so recover the guard instead of erroring.
    fn read_slots(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<u8>>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slots(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<u8>>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArtifactStore for MemoryStore {
    fn read(&self, key: &str) -> CotejoResult<Option<Vec<u8>>> {
        Ok(self.read_slots().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> CotejoResult<()> {
        self.write_slots().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Directory-backed store: one file per key under a root directory
///
/// Writes land in a temp file first and are renamed into place, so a slot is
/// never observed half-written by a concurrent reader or after a crash.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Root directory used when the caller does not name one
    pub const DEFAULT_ROOT: &'static str = "__cotejo__";

    /// Open a store rooted at `root`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns [`CotejoError::Storage`] when the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> CotejoResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| CotejoError::Storage {
            message: format!("Failed to create store directory {}: {e}", root.display()),
        })?;
        debug!("Opened artifact store at {}", root.display());
        Ok(Self { root })
    }

    /// Store root on disk
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted slot keys currently present
    ///
    /// # Errors
    ///
    /// Returns [`CotejoError::Storage`] when the root cannot be listed.
    pub fn keys(&self) -> CotejoResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| CotejoError::Storage {
            message: format!(
                "Failed to list store directory {}: {e}",
                self.root.display()
            ),
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CotejoError::Storage {
                message: format!(
                    "Failed to list store directory {}: {e}",
                    self.root.display()
                ),
            })?;
            if !entry.file_type().map_or(false, |t| t.is_file()) {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                // Leftover temp files from an interrupted write are not slots.
                if !name.ends_with(TMP_SUFFIX) {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn slot_path(&self, key: &str) -> CotejoResult<PathBuf> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(CotejoError::Storage {
                message: format!("Invalid slot key {key:?}: keys are file names, not paths"),
            });
        }
        Ok(self.root.join(key))
    }
}

impl ArtifactStore for DirStore {
    fn read(&self, key: &str) -> CotejoResult<Option<Vec<u8>>> {
        let path = self.slot_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CotejoError::Storage {
                message: format!("Failed to read {}: {e}", path.display()),
            }),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> CotejoResult<()> {
        let path = self.slot_path(key)?;
        let tmp = self.root.join(format!("{key}{TMP_SUFFIX}"));
        fs::write(&tmp, bytes).map_err(|e| CotejoError::Storage {
            message: format!("Failed to write {}: {e}", tmp.display()),
        })?;
        fs::rename(&tmp, &path).map_err(|e| CotejoError::Storage {
            message: format!("Failed to commit {}: {e}", path.display()),
        })?;
        debug!("Wrote {} bytes to slot {key}", bytes.len());
        Ok(())
    }
}
