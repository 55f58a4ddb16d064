//! CLI command execution.
//!
//! Each command maps onto one public operation of [`AuthService`] and
//! produces both a human-readable line and the JSON response envelope.

use anyhow::{Context, Result};
use serde_json::Value;
use taxdesk_auth::auth::{
    AuthError, AuthResponse, AuthService, SessionResponse, SignOutResponse, SignUpResponse,
    TokenResponse, UserResponse,
};

use crate::logging::log_security_event;

/// A parsed CLI command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignUp {
        name: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Session,
    WhoAmI,
    Logout,
    Token,
}

/// Result of running a command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// False when the operation returned an error
    pub success: bool,
    /// Line shown to the user
    pub message: String,
    /// Response envelope for `--json`
    pub json: Value,
}

impl CommandOutput {
    fn new(success: bool, message: impl Into<String>, json: Value) -> Self {
        Self {
            success,
            message: message.into(),
            json,
        }
    }
}

/// Run a command against the auth service
///
/// Operation failures are reported through `CommandOutput::success`; only
/// serialization failures surface as `Err`.
pub async fn execute(auth: &AuthService, command: Command) -> Result<CommandOutput> {
    let output = match command {
        Command::SignUp {
            name,
            email,
            password,
        } => {
            let result = auth.register_user(&name, &email, &password).await;
            let message = match &result {
                Ok(_) => "Signed up successfully!".to_string(),
                Err(e) => e.client_message(),
            };
            let success = result.is_ok();
            CommandOutput::new(success, message, to_json(SignUpResponse::from(result))?)
        }
        Command::Login { email, password } => {
            let result = auth.authenticate(&email, &password).await;
            let message = match &result {
                Ok(_) => "Logged in successfully!".to_string(),
                Err(e) => {
                    if matches!(e, AuthError::InvalidCredentials) {
                        log_security_event(
                            "failed_login",
                            Some(email.as_str()),
                            "Invalid credentials",
                        );
                    }
                    e.client_message()
                }
            };
            let success = result.is_ok();
            CommandOutput::new(success, message, to_json(AuthResponse::from(result))?)
        }
        Command::Session => {
            let result = auth.get_session().await;
            let message = match &result {
                Ok(Some(session)) => match &session.name {
                    Some(name) => format!("Signed in as {name} <{}>", session.email),
                    None => format!("Signed in as {}", session.email),
                },
                Ok(None) => "Not signed in".to_string(),
                Err(e) => e.client_message(),
            };
            let success = result.is_ok();
            CommandOutput::new(success, message, to_json(SessionResponse::from(result))?)
        }
        Command::WhoAmI => {
            let result = auth.get_user().await;
            let message = match &result {
                Ok(Some(user)) => {
                    let role = if user.is_admin { " (admin)" } else { "" };
                    format!("{} <{}>{role} id={}", user.name, user.email, user.id)
                }
                Ok(None) => "Not signed in".to_string(),
                Err(e) => {
                    if matches!(e, AuthError::SessionInvalid) {
                        log_security_event("forced_sign_out", None, "Session no longer valid");
                    }
                    e.client_message()
                }
            };
            let success = result.is_ok();
            CommandOutput::new(success, message, to_json(UserResponse::from(result))?)
        }
        Command::Logout => {
            let result = auth.sign_out().await;
            let message = match &result {
                Ok(()) => "Signed out successfully!".to_string(),
                Err(e) => e.client_message(),
            };
            let success = result.is_ok();
            CommandOutput::new(success, message, to_json(SignOutResponse::from(result))?)
        }
        Command::Token => {
            let result = auth.get_access_token().await;
            let message = match &result {
                Ok(Some(token)) => token.clone(),
                Ok(None) => "Not signed in".to_string(),
                Err(e) => e.client_message(),
            };
            let success = result.is_ok();
            CommandOutput::new(success, message, to_json(TokenResponse::from(result))?)
        }
    };

    Ok(output)
}

fn to_json<T: serde::Serialize>(response: T) -> Result<Value> {
    serde_json::to_value(response).context("Failed to serialize response")
}
