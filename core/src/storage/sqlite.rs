//! SQLite-backed slot storage

use super::KeyValueStorage;
use crate::database::{create_pool, Repository};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

#[derive(Clone)]
pub struct SqliteStorage {
    repo: Repository,
}

impl SqliteStorage {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open (creating and migrating if needed) the database at `db_path`
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = create_pool(db_path).await?;
        Ok(Self::new(Repository::new(pool)))
    }
}

#[async_trait]
impl KeyValueStorage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.repo.get_slot(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.repo.set_slot(key, value).await
    }
}
