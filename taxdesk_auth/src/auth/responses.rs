//! Caller-facing response envelopes.
//!
//! Every operation result can be flattened into a `{ ..., "error": ... }`
//! object where exactly one side is populated. Error text always comes from
//! [`AuthError::client_message`].

use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use super::models::{Session, User, UserRecord};

/// Common API error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl From<&AuthError> for ApiError {
    fn from(err: &AuthError) -> Self {
        Self {
            message: err.client_message(),
        }
    }
}

/// Response for sign-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub user: Option<User>,
    pub error: Option<ApiError>,
}

impl From<AuthResult<UserRecord>> for SignUpResponse {
    fn from(result: AuthResult<UserRecord>) -> Self {
        match result {
            // The envelope leaves the process, so the hash goes.
            Ok(record) => Self {
                user: Some(record.into_user()),
                error: None,
            },
            Err(e) => Self {
                user: None,
                error: Some((&e).into()),
            },
        }
    }
}

/// Response for sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: Option<User>,
    pub session: Option<Session>,
    pub error: Option<ApiError>,
}

impl From<AuthResult<(User, Session)>> for AuthResponse {
    fn from(result: AuthResult<(User, Session)>) -> Self {
        match result {
            Ok((user, session)) => Self {
                user: Some(user),
                session: Some(session),
                error: None,
            },
            Err(e) => Self {
                user: None,
                session: None,
                error: Some((&e).into()),
            },
        }
    }
}

/// Response for fetching the current user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: Option<User>,
    pub error: Option<ApiError>,
}

impl From<AuthResult<Option<User>>> for UserResponse {
    fn from(result: AuthResult<Option<User>>) -> Self {
        match result {
            Ok(user) => Self { user, error: None },
            Err(e) => Self {
                user: None,
                error: Some((&e).into()),
            },
        }
    }
}

/// Response for fetching the current session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: Option<Session>,
    pub error: Option<ApiError>,
}

impl From<AuthResult<Option<Session>>> for SessionResponse {
    fn from(result: AuthResult<Option<Session>>) -> Self {
        match result {
            Ok(session) => Self {
                session,
                error: None,
            },
            Err(e) => Self {
                session: None,
                error: Some((&e).into()),
            },
        }
    }
}

/// Response for sign-out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub error: Option<ApiError>,
}

impl From<AuthResult<()>> for SignOutResponse {
    fn from(result: AuthResult<()>) -> Self {
        Self {
            error: result.err().map(|e| (&e).into()),
        }
    }
}

/// Response for fetching the access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: Option<String>,
    pub error: Option<ApiError>,
}

impl From<AuthResult<Option<String>>> for TokenResponse {
    fn from(result: AuthResult<Option<String>>) -> Self {
        match result {
            Ok(token) => Self { token, error: None },
            Err(e) => Self {
                token: None,
                error: Some((&e).into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_sign_up_response_strips_hash() {
        let now = Utc::now();
        let record = UserRecord {
            id: "u-1".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            is_admin: false,
            profile_pic: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&SignUpResponse::from(Ok(record))).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"error\":null"));
    }

    #[test]
    fn test_auth_response_error_uses_client_message() {
        let response = AuthResponse::from(Err(AuthError::StoreUnavailable(
            "pool timed out".to_string(),
        )));

        assert!(response.user.is_none());
        assert!(response.session.is_none());
        assert_eq!(response.error.unwrap().message, "Internal server error");
    }

    #[test]
    fn test_user_response_signed_out_is_not_an_error() {
        let response = UserResponse::from(Ok(None));
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["user"].is_null());
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_sign_out_response() {
        assert!(SignOutResponse::from(Ok(())).error.is_none());
    }

    #[test]
    fn test_token_response() {
        let json = serde_json::to_value(TokenResponse::from(Ok(Some("u-1".to_string())))).unwrap();
        assert_eq!(json["token"], "u-1");
        assert!(json["error"].is_null());

        let response = TokenResponse::from(Err(AuthError::StoreUnavailable("down".to_string())));
        assert!(response.token.is_none());
        assert_eq!(response.error.unwrap().message, "Internal server error");
    }
}
