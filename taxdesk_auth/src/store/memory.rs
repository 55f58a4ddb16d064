//! In-memory user store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::{StoreError, StoreResult, UserFilter, UserStore};
use crate::auth::{NewUser, UserRecord};

/// Name reported for duplicate-email violations, matching the PostgreSQL
/// constraint created by the schema bootstrap
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Process-local store keyed by user id.
///
/// Cloning shares the underlying map. Used by tests and by the CLI when no
/// database is configured.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<String, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> StoreResult<MutexGuard<'_, HashMap<String, UserRecord>>> {
        self.users
            .lock()
            .map_err(|_| StoreError::Other("user map poisoned".to_string()))
    }

    /// Remove a user out-of-band. Returns whether a row was removed.
    pub fn delete(&self, user_id: &str) -> bool {
        self.users
            .lock()
            .map(|mut users| users.remove(user_id).is_some())
            .unwrap_or(false)
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut users = self.users()?;

        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation {
                constraint: EMAIL_UNIQUE_CONSTRAINT.to_string(),
            });
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            profile_pic: None,
            created_at: now,
            updated_at: now,
        };

        users.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn select_one(&self, filter: &UserFilter) -> StoreResult<UserRecord> {
        let users = self.users()?;

        let found = match filter {
            UserFilter::Id(id) => users.get(id).cloned(),
            UserFilter::Email(email) => users.values().find(|u| &u.email == email).cloned(),
        };

        found.ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "hash123".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = MemoryUserStore::new();

        let a = store.insert(new_user("a@example.com")).await.unwrap();
        let b = store.insert(new_user("b@example.com")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
        assert!(!a.is_admin);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryUserStore::new();
        store.insert(new_user("dup@example.com")).await.unwrap();

        let err = store.insert(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let store = MemoryUserStore::new();
        store.insert(new_user("Case@example.com")).await.unwrap();

        let result = store
            .select_one(&UserFilter::Email("case@example.com".to_string()))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));

        // Different case is a different email, so the insert succeeds.
        assert!(store.insert(new_user("case@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_select_by_id_and_delete() {
        let store = MemoryUserStore::new();
        let user = store.insert(new_user("x@example.com")).await.unwrap();

        let found = store
            .select_one(&UserFilter::Id(user.id.clone()))
            .await
            .unwrap();
        assert_eq!(found, user);

        assert!(store.delete(&user.id));
        assert!(!store.delete(&user.id));
        assert!(matches!(
            store.select_one(&UserFilter::Id(user.id)).await,
            Err(StoreError::NotFound)
        ));
    }
}
