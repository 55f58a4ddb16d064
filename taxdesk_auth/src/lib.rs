//! # TaxDesk Auth
//!
//! Credential authentication and session management for the TaxDesk
//! payroll and tax-filing application.
//!
//! ## Core Modules
//!
//! - [`auth`]: The [`AuthService`], user and session models, password policy and hashing
//! - [`store`]: The user record store contract and an in-memory implementation
//! - [`session`]: Client-held session storage (in memory or a JSON file)
//! - [`db`]: PostgreSQL pool, schema bootstrap and the PostgreSQL user store
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use taxdesk_auth::{AuthService, HashingConfig, MemorySessionStorage, MemoryUserStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), taxdesk_auth::AuthError> {
//! let auth = AuthService::new(
//!     Arc::new(MemoryUserStore::new()),
//!     Arc::new(MemorySessionStorage::new()),
//!     &HashingConfig::default(),
//! )?;
//!
//! assert!(auth.get_session().await?.is_none());
//! # Ok(())
//! # }
//! ```

/// Credential and session service.
pub mod auth;
pub use auth::{AuthError, AuthResult, AuthService, HashingConfig, Session, User, UserRecord};

/// PostgreSQL access.
pub mod db;

/// Client-held session storage.
pub mod session;
pub use session::{FileSessionStorage, MemorySessionStorage, SessionStorage};

/// User record store contract.
pub mod store;
pub use store::{MemoryUserStore, StoreError, UserFilter, UserStore};
