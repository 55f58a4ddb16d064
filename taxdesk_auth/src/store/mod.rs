//! Record store contract for user accounts.
//!
//! The authentication service only needs two operations from the store:
//! insert a user row and select exactly one row by a field equality filter.
//! Keeping the contract this narrow lets the service run against PostgreSQL
//! ([`crate::db::PgUserStore`]) or the in-memory [`MemoryUserStore`].

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::auth::{NewUser, UserRecord};

pub mod memory;

pub use memory::MemoryUserStore;

/// Field equality filter for [`UserStore::select_one`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// `id = value`
    Id(String),
    /// `email = value`, case-sensitive
    Email(String),
}

impl UserFilter {
    /// Column the filter applies to
    pub fn field(&self) -> &'static str {
        match self {
            UserFilter::Id(_) => "id",
            UserFilter::Email(_) => "email",
        }
    }

    /// Value the column must equal
    pub fn value(&self) -> &str {
        match self {
            UserFilter::Id(v) | UserFilter::Email(v) => v,
        }
    }
}

impl fmt::Display for UserFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:?}", self.field(), self.value())
    }
}

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// No row matched the filter
    #[error("Record not found")]
    NotFound,

    /// The transport gave up waiting for the store
    #[error("Store operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Anything else reported by the store
    #[error("Store error: {0}")]
    Other(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for user record store operations
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return the stored row, including the
    /// store-assigned id and timestamps
    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord>;

    /// Fetch exactly one user matching the filter
    async fn select_one(&self, filter: &UserFilter) -> StoreResult<UserRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_display() {
        let filter = UserFilter::Email("a@b.c".to_string());
        assert_eq!(filter.field(), "email");
        assert_eq!(filter.to_string(), "email = \"a@b.c\"");
    }
}
