//! Storage module
//!
//! Key-value backends the store persists its slots to, and the versioned
//! envelope each slot is written in.

pub mod codec;
pub mod file_store;
pub mod memory;
pub mod sqlite;

pub use file_store::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::error::Result;
use async_trait::async_trait;

/// Asynchronous text key-value storage.
///
/// Failures are reported as errors, never panics. Implementations must be
/// safe to share between the store and its background writer.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read a slot; `Ok(None)` when the key has never been written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value of a slot
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
