//! Application state and initialization
//!
//! Builds the configured storage backend and the store, loads persisted
//! data once at startup and tears the store down on exit. Screens receive
//! the store through `AppState` rather than a global.

use crate::config::{StorageBackend, StoreConfig};
use crate::error::Result;
use crate::services::{LoadReport, ProfileStore};
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage, SqliteStorage};
use std::path::PathBuf;
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub store: ProfileStore,
}

impl AppState {
    /// Wrap an existing storage backend; the store is not loaded yet
    pub fn new(app_data_dir: PathBuf, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            app_data_dir,
            store: ProfileStore::new(storage),
        }
    }

    /// Application setup - called once on startup
    pub async fn setup(config: &StoreConfig) -> Result<(Self, LoadReport)> {
        tracing::info!("Initializing application");
        tracing::info!("App data directory: {:?}", config.data_dir);

        let storage = open_storage(config).await?;
        let state = Self::new(config.data_dir.clone(), storage);
        let report = state.store.load().await;

        tracing::info!("Application initialized successfully");

        Ok((state, report))
    }

    /// Flush pending writes and stop background work
    pub async fn shutdown(&self) {
        self.store.shutdown().await;
        tracing::info!("Application shut down");
    }
}

async fn open_storage(config: &StoreConfig) -> Result<Arc<dyn KeyValueStorage>> {
    tracing::info!("Using {:?} storage backend", config.backend);

    let storage: Arc<dyn KeyValueStorage> = match config.backend {
        StorageBackend::Sqlite => {
            tokio::fs::create_dir_all(&config.data_dir).await?;
            Arc::new(SqliteStorage::open(&config.database_path()).await?)
        }
        StorageBackend::File => {
            let files = FileStorage::new(config.slot_dir());
            files.initialize().await?;
            Arc::new(files)
        }
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    };

    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WishlistItem;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_setup_memory_backend() {
        let config = StoreConfig {
            data_dir: PathBuf::from("unused"),
            backend: StorageBackend::Memory,
        };

        let (state, report) = AppState::setup(&config).await.unwrap();

        assert!(state.store.is_loaded());
        assert_eq!(report.missing.len(), 4);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_file_backend_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig {
            data_dir: temp_dir.path().to_path_buf(),
            backend: StorageBackend::File,
        };

        {
            let (state, _) = AppState::setup(&config).await.unwrap();
            state
                .store
                .add_to_wishlist(WishlistItem::new("p7", "Sun Cream", 18.5, "img"));
            state.shutdown().await;
        }

        let (state, report) = AppState::setup(&config).await.unwrap();
        assert_eq!(report.restored.len(), 4);
        assert!(state.store.is_in_wishlist("p7"));
        state.shutdown().await;
    }
}
