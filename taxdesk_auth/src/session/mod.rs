//! Client-held durable key/value storage for session identifiers.
//!
//! Sign-in writes [`USER_ID_KEY`] and [`USER_EMAIL_KEY`], session lookups
//! read them and sign-out removes them. Nothing else is kept client-side.

use async_trait::async_trait;
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileSessionStorage;
pub use memory::MemorySessionStorage;

/// Key holding the signed-in user's id
pub const USER_ID_KEY: &str = "user_id";

/// Key holding the signed-in user's email
pub const USER_EMAIL_KEY: &str = "user_email";

/// Session storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not hold a JSON object of strings
    #[error("Corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// In-process lock poisoned by a panicking writer
    #[error("Session storage lock poisoned")]
    Poisoned,
}

/// Result type for session storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for client-held key/value storage
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read a key, `None` when absent
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a key, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key; removing an absent key is not an error
    async fn remove(&self, key: &str) -> StorageResult<()>;
}
