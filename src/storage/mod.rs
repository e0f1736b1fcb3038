//! Key-value persistence port and the backends shipped with the crate.
//!
//! Backends store raw strings. Encoding the cart is the actor's job, so a
//! backend never needs to know what it is holding.

pub mod error;
pub mod file;
pub mod memory;

use async_trait::async_trait;

pub use error::*;
pub use file::JsonFileStore;
pub use memory::InMemoryStore;

/// Asynchronous string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces whatever is stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}
