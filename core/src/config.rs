//! Application configuration
//!
//! Central location for the storage slot keys, schema version and
//! environment-driven settings used to set up the store.

use crate::error::{AppError, Result};
use std::path::PathBuf;
use std::str::FromStr;

// ===== Storage Slots =====

/// Slot holding the serialized skin profile object
pub const SLOT_USER_PROFILE: &str = "userProfile";
/// Slot holding the serialized routines array
pub const SLOT_ROUTINES: &str = "routines";
/// Slot holding the serialized progress entries array
pub const SLOT_PROGRESS_ENTRIES: &str = "progressEntries";
/// Slot holding the serialized wishlist array
pub const SLOT_WISHLIST: &str = "wishlist";

/// All slots, in the order they are read and written
pub const ALL_SLOTS: [&str; 4] = [
    SLOT_USER_PROFILE,
    SLOT_ROUTINES,
    SLOT_PROGRESS_ENTRIES,
    SLOT_WISHLIST,
];

// ===== Schema =====

/// Version stamped into every persisted slot envelope.
/// Payloads without an envelope are treated as version 0.
pub const SCHEMA_VERSION: u32 = 1;

// ===== Data Directory =====

/// Default data directory when `SKINCARE_DATA_DIR` is unset
pub const DEFAULT_DATA_DIR: &str = "./data";

/// SQLite database file name inside the data directory
pub const DATABASE_FILE_NAME: &str = "skincare.db";

/// Directory (inside the data directory) used by the file backend
pub const SLOT_DIR_NAME: &str = "slots";

// ===== Environment =====

pub const ENV_DATA_DIR: &str = "SKINCARE_DATA_DIR";
pub const ENV_STORAGE: &str = "SKINCARE_STORAGE";

/// Which key-value backend the store persists to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    File,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "file" | "files" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(AppError::Config(format!(
                "Unknown storage backend '{}'. Use 'sqlite', 'file' or 'memory'",
                other
            ))),
        }
    }
}

/// Runtime settings for the store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            backend: StorageBackend::default(),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        let data_dir = std::env::var(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let backend = match std::env::var(ENV_STORAGE) {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::default(),
        };

        Ok(Self { data_dir, backend })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    pub fn slot_dir(&self) -> PathBuf {
        self.data_dir.join(SLOT_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("sqlite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert_eq!(" File ".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!(matches!(
            "redis".parse::<StorageBackend>(),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_paths_derive_from_data_dir() {
        let config = StoreConfig {
            data_dir: PathBuf::from("/tmp/skin"),
            backend: StorageBackend::File,
        };

        assert_eq!(config.database_path(), PathBuf::from("/tmp/skin/skincare.db"));
        assert_eq!(config.slot_dir(), PathBuf::from("/tmp/skin/slots"));
    }

    #[test]
    fn test_slots_are_distinct() {
        let mut slots = ALL_SLOTS.to_vec();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), 4);
    }
}
