//! Authentication module providing user registration, sign-in, and session management.
//!
//! This module implements:
//! - Password strength policy enforced before any store access
//! - Argon2id password hashing with an optional server-side pepper
//! - Indistinguishable sign-in failures (unknown email, wrong password, store error)
//! - Client-held sessions re-validated against the store on every lookup
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taxdesk_auth::auth::{AuthService, HashingConfig};
//! use taxdesk_auth::db::{Database, DatabaseConfig, PgUserStore};
//! use taxdesk_auth::session::FileSessionStorage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::development();
//!     let db = Database::new(&config).await?;
//!     let auth = AuthService::new(
//!         Arc::new(PgUserStore::new(db.pool().clone(), config.query_timeout())),
//!         Arc::new(FileSessionStorage::new("session.json")),
//!         &HashingConfig::default(),
//!     )?;
//!
//!     auth.register_user("Asha", "asha@example.com", "Secur3!pass").await?;
//!     let (user, _session) = auth.authenticate("asha@example.com", "Secur3!pass").await?;
//!     println!("Signed in as {}", user.name);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod models;
pub mod password;
pub mod responses;
pub mod service;

pub use errors::{AuthError, AuthResult};
pub use models::{NewUser, Session, User, UserId, UserRecord};
pub use password::{CredentialHasher, HashingConfig, validate_password};
pub use responses::{
    ApiError, AuthResponse, SessionResponse, SignOutResponse, SignUpResponse, TokenResponse,
    UserResponse,
};
pub use service::AuthService;
