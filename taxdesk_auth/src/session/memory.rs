//! In-memory session storage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{SessionStorage, StorageError, StorageResult};

/// Session storage that lives as long as the process. Clones share state.
#[derive(Clone, Default)]
pub struct MemorySessionStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = MemorySessionStorage::new();

        assert_eq!(storage.get("user_id").await.unwrap(), None);

        storage.set("user_id", "42").await.unwrap();
        storage.set("user_id", "43").await.unwrap();
        assert_eq!(storage.get("user_id").await.unwrap().as_deref(), Some("43"));

        storage.remove("user_id").await.unwrap();
        storage.remove("user_id").await.unwrap();
        assert_eq!(storage.get("user_id").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let storage = MemorySessionStorage::new();
        let other = storage.clone();

        storage.set("user_email", "a@b.c").await.unwrap();
        assert_eq!(
            other.get("user_email").await.unwrap().as_deref(),
            Some("a@b.c")
        );
    }
}
