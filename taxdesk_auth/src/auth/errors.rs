//! Authentication error types.

use thiserror::Error;

use crate::session::StorageError;

/// Message shown for every failed sign-in, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";

/// Password policy text shown on registration.
pub const WEAK_PASSWORD_MESSAGE: &str = "Password must be at least 8 characters long and include uppercase, lowercase, number, and special character.";

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password does not satisfy the strength policy
    #[error("Password too weak: {0}")]
    WeakPassword(String),

    /// Email already registered
    #[error("Email already exists.")]
    EmailAlreadyExists,

    /// Store rejected the new user for a reason other than a duplicate email
    #[error("Failed to register user: {0}")]
    RegistrationFailed(String),

    /// Unknown email, wrong password, or store failure during sign-in
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// The session no longer resolves to a user
    #[error("User not found or session invalid.")]
    SessionInvalid,

    /// Store could not be reached or returned an unclassified failure
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Client-held session storage failed
    #[error("Session storage error: {0}")]
    ClientStorage(#[from] StorageError),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Store and storage failures are sanitized so internal details never
    /// reach an end user.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::WeakPassword(_) => WEAK_PASSWORD_MESSAGE.to_string(),
            AuthError::RegistrationFailed(_) => "Failed to register user.".to_string(),
            AuthError::StoreUnavailable(_) => "Internal server error".to_string(),
            AuthError::ClientStorage(_) => "Could not access session storage".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_store_details() {
        let err = AuthError::StoreUnavailable("connection refused to 10.0.0.5:5432".to_string());
        assert!(err.to_string().contains("10.0.0.5"));
        assert_eq!(err.client_message(), "Internal server error");

        let err = AuthError::RegistrationFailed("relation \"users\" does not exist".to_string());
        assert_eq!(err.client_message(), "Failed to register user.");
    }

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            AuthError::InvalidCredentials.client_message(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }
}
