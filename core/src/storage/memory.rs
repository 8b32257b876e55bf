//! In-process storage backend
//!
//! Keeps slots in a map. Used for ephemeral runs and tests; clones share
//! the same map so a test can inspect what the store wrote.

use super::KeyValueStorage;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with the given slots
    pub fn with_slots<K, V>(slots: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = slots
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self {
            slots: Arc::new(RwLock::new(map)),
        }
    }

    /// Synchronous peek, for inspection outside an async context
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());

        tracing::debug!("Wrote memory slot: {} ({} bytes)", key, value.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("routines").await.unwrap(), None);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let storage = MemoryStorage::new();

        storage.set("wishlist", "[]").await.unwrap();
        storage.set("wishlist", "[1]").await.unwrap();

        assert_eq!(storage.get("wishlist").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_slots() {
        let storage = MemoryStorage::with_slots([("userProfile", "{}")]);
        let other = storage.clone();

        other.set("routines", "[]").await.unwrap();

        assert_eq!(storage.raw("routines").as_deref(), Some("[]"));
        assert_eq!(storage.raw("userProfile").as_deref(), Some("{}"));
    }
}
