//! Profile and board persistence.
//!
//! Both stores are flat name → record maps. [`JsonFileStore`] keeps them in
//! `profiles.json` and `boards.json` under a data directory; a missing or
//! unreadable file reads as empty so a fresh install or a hand-damaged file
//! never blocks the app. [`MemoryStore`] is the in-process equivalent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

use crate::domain::{Board, Profile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid profile name: {0:?}")]
    InvalidName(String),
}

pub trait ProfileStore {
    /// Profile names, sorted.
    fn list_profiles(&self) -> Result<Vec<String>, StoreError>;

    fn get_profile(&self, name: &str) -> Result<Option<Profile>, StoreError>;

    /// Insert or replace.
    fn save_profile(&self, name: &str, profile: &Profile) -> Result<(), StoreError>;

    /// Returns whether a profile was removed.
    fn delete_profile(&self, name: &str) -> Result<bool, StoreError>;
}

pub trait BoardStore {
    /// The user's board, or an empty board if none was saved.
    fn get_board(&self, name: &str) -> Result<Board, StoreError>;

    fn save_board(&self, name: &str, board: &Board) -> Result<(), StoreError>;
}

fn check_name(name: &str) -> Result<&str, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(StoreError::InvalidName(name.to_string()))
    } else {
        Ok(trimmed)
    }
}

// ── JSON files ───────────────────────────────────────────────────────

/// File-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn profiles_path(&self) -> PathBuf {
        self.data_dir.join("profiles.json")
    }

    fn boards_path(&self) -> PathBuf {
        self.data_dir.join("boards.json")
    }

    /// Read a name → record map. Missing or corrupt files read as empty.
    fn read_map<T: DeserializeOwned>(&self, path: &Path) -> BTreeMap<String, T> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable store file, treating as empty");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt store file, treating as empty");
                BTreeMap::new()
            }
        }
    }

    /// Write a map as pretty JSON, atomically (write .tmp, rename into place).
    fn write_map<T: Serialize>(&self, path: &Path, map: &BTreeMap<String, T>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(&self.data_dir).map_err(io_err)?;
        let json = serde_json::to_string_pretty(map)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            io_err(e)
        })
    }
}

impl ProfileStore for JsonFileStore {
    fn list_profiles(&self) -> Result<Vec<String>, StoreError> {
        let map: BTreeMap<String, Profile> = self.read_map(&self.profiles_path());
        Ok(map.into_keys().collect())
    }

    fn get_profile(&self, name: &str) -> Result<Option<Profile>, StoreError> {
        let mut map: BTreeMap<String, Profile> = self.read_map(&self.profiles_path());
        Ok(map.remove(name.trim()))
    }

    fn save_profile(&self, name: &str, profile: &Profile) -> Result<(), StoreError> {
        let name = check_name(name)?;
        let path = self.profiles_path();
        let mut map: BTreeMap<String, Profile> = self.read_map(&path);
        map.insert(name.to_string(), profile.clone());
        self.write_map(&path, &map)?;
        tracing::debug!(name, "saved profile");
        Ok(())
    }

    fn delete_profile(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.profiles_path();
        let mut map: BTreeMap<String, Profile> = self.read_map(&path);
        if map.remove(name.trim()).is_none() {
            return Ok(false);
        }
        self.write_map(&path, &map)?;
        Ok(true)
    }
}

impl BoardStore for JsonFileStore {
    fn get_board(&self, name: &str) -> Result<Board, StoreError> {
        let mut map: BTreeMap<String, Board> = self.read_map(&self.boards_path());
        Ok(map.remove(name.trim()).unwrap_or_default())
    }

    fn save_board(&self, name: &str, board: &Board) -> Result<(), StoreError> {
        let name = check_name(name)?;
        let path = self.boards_path();
        let mut map: BTreeMap<String, Board> = self.read_map(&path);
        map.insert(name.to_string(), board.clone());
        self.write_map(&path, &map)
    }
}

// ── In memory ────────────────────────────────────────────────────────

/// Process-local store with the same semantics as [`JsonFileStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: RwLock<BTreeMap<String, Profile>>,
    boards: RwLock<BTreeMap<String, Board>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn list_profiles(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.profiles.read().unwrap_or_else(|e| e.into_inner()).keys().cloned().collect())
    }

    fn get_profile(&self, name: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name.trim())
            .cloned())
    }

    fn save_profile(&self, name: &str, profile: &Profile) -> Result<(), StoreError> {
        let name = check_name(name)?;
        self.profiles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), profile.clone());
        Ok(())
    }

    fn delete_profile(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self
            .profiles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(name.trim())
            .is_some())
    }
}

impl BoardStore for MemoryStore {
    fn get_board(&self, name: &str) -> Result<Board, StoreError> {
        Ok(self
            .boards
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name.trim())
            .cloned()
            .unwrap_or_default())
    }

    fn save_board(&self, name: &str, board: &Board) -> Result<(), StoreError> {
        let name = check_name(name)?;
        self.boards
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), board.clone());
        Ok(())
    }
}
