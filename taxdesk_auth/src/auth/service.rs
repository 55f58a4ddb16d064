//! Credential and session service.

use log::{debug, info, warn};
use std::sync::Arc;

use super::{
    errors::{AuthError, AuthResult},
    models::{NewUser, Session, User, UserRecord},
    password::{CredentialHasher, HashingConfig, validate_password},
};
use crate::session::{SessionStorage, USER_EMAIL_KEY, USER_ID_KEY};
use crate::store::{StoreError, UserFilter, UserStore};

// Verified against when the email is unknown so that a miss costs about as
// much as a wrong password.
const DUMMY_PASSWORD: &str = "Dummy-password-0";

/// Authentication service
///
/// Owns password hashing and verification, user creation, and the
/// client-held session identifiers. The user store and the session storage
/// are injected so the service can run against PostgreSQL and a session
/// file, or entirely in memory.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    storage: Arc<dyn SessionStorage>,
    hasher: CredentialHasher,
    dummy_hash: Arc<str>,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `store` - User record store
    /// * `storage` - Client-held session storage
    /// * `hashing` - Argon2id cost parameters and optional pepper
    ///
    /// # Errors
    ///
    /// * `AuthError::RegistrationFailed` - Hashing parameters are invalid
    pub fn new(
        store: Arc<dyn UserStore>,
        storage: Arc<dyn SessionStorage>,
        hashing: &HashingConfig,
    ) -> AuthResult<Self> {
        let hasher = CredentialHasher::new(hashing)?;
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            store,
            storage,
            hasher,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Register a new user
    ///
    /// Registration does not sign the user in. The returned row is the raw
    /// store row, password hash included.
    ///
    /// # Errors
    ///
    /// * `AuthError::WeakPassword` - Password fails the strength policy; the
    ///   store is not touched
    /// * `AuthError::EmailAlreadyExists` - Email already registered
    /// * `AuthError::RegistrationFailed` - Any other store or hashing failure
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<UserRecord> {
        validate_password(password)?;

        let password_hash = self.hasher.hash(password)?;

        let new_user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            is_admin: false,
        };

        match self.store.insert(new_user).await {
            Ok(record) => {
                info!("Registered user {}", record.id);
                Ok(record)
            }
            Err(StoreError::UniqueViolation { constraint }) => {
                debug!("Registration rejected by constraint {constraint}");
                Err(AuthError::EmailAlreadyExists)
            }
            Err(e) => {
                warn!("Registration failed: {e}");
                Err(AuthError::RegistrationFailed(e.to_string()))
            }
        }
    }

    /// Sign a user in with email and password
    ///
    /// On success the session identifiers are written to client storage,
    /// replacing any earlier session.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Unknown email, wrong password, or
    ///   a store failure; the three cases are indistinguishable
    /// * `AuthError::ClientStorage` - Session identifiers could not be saved
    pub async fn authenticate(&self, email: &str, password: &str) -> AuthResult<(User, Session)> {
        let record = match self
            .store
            .select_one(&UserFilter::Email(email.to_string()))
            .await
        {
            Ok(record) => record,
            Err(e) => {
                if !matches!(e, StoreError::NotFound) {
                    warn!("Credential lookup failed: {e}");
                }
                // Burn the same hashing cost as a real check.
                let _ = self.hasher.verify(password, &self.dummy_hash);
                debug!("Sign-in failed for {email}");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &record.password_hash) {
            debug!("Sign-in failed for {email}");
            return Err(AuthError::InvalidCredentials);
        }

        self.storage.set(USER_ID_KEY, &record.id).await?;
        self.storage.set(USER_EMAIL_KEY, &record.email).await?;

        info!("User {} signed in", record.id);

        let session = Session {
            user_id: record.id.clone(),
            email: record.email.clone(),
            name: None,
        };

        Ok((record.into_user(), session))
    }

    /// Current session, or `None` when nobody is signed in
    ///
    /// The display name is looked up again on every call. A missing user row
    /// leaves `name` empty; [`AuthService::get_user`] is what invalidates the
    /// session in that case.
    ///
    /// # Errors
    ///
    /// * `AuthError::StoreUnavailable` - The name lookup failed for a reason
    ///   other than a missing row
    /// * `AuthError::ClientStorage` - Session storage could not be read
    pub async fn get_session(&self) -> AuthResult<Option<Session>> {
        let Some((user_id, email)) = self.stored_identifiers().await? else {
            return Ok(None);
        };

        let name = match self.store.select_one(&UserFilter::Id(user_id.clone())).await {
            Ok(record) => Some(record.name),
            Err(StoreError::NotFound) => None,
            Err(e) => return Err(AuthError::StoreUnavailable(e.to_string())),
        };

        Ok(Some(Session {
            user_id,
            email,
            name,
        }))
    }

    /// Current user, or `None` when nobody is signed in
    ///
    /// If the session's user can no longer be fetched, whether the row is
    /// gone or the store failed, the session is cleared before the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// * `AuthError::SessionInvalid` - The session's user is gone or the store
    ///   failed; the client is signed out
    /// * `AuthError::ClientStorage` - Session storage could not be read or cleared
    pub async fn get_user(&self) -> AuthResult<Option<User>> {
        let Some((user_id, _)) = self.stored_identifiers().await? else {
            return Ok(None);
        };

        match self.store.select_one(&UserFilter::Id(user_id.clone())).await {
            Ok(record) => Ok(Some(record.into_user())),
            Err(e) => {
                warn!("Session for user {user_id} no longer valid ({e}), signing out");
                self.sign_out().await?;
                Err(AuthError::SessionInvalid)
            }
        }
    }

    /// Clear the client-held session. Safe to call when signed out.
    ///
    /// # Errors
    ///
    /// * `AuthError::ClientStorage` - Session storage could not be updated
    pub async fn sign_out(&self) -> AuthResult<()> {
        self.storage.remove(USER_ID_KEY).await?;
        self.storage.remove(USER_EMAIL_KEY).await?;
        info!("Signed out");
        Ok(())
    }

    /// Bearer token for the current session, or `None` when signed out
    ///
    /// The token is the raw user id. It carries no signature and no expiry.
    pub async fn get_access_token(&self) -> AuthResult<Option<String>> {
        Ok(self.stored_identifiers().await?.map(|(user_id, _)| user_id))
    }

    /// Stored `(user_id, email)`; empty values count as absent
    async fn stored_identifiers(&self) -> AuthResult<Option<(String, String)>> {
        let user_id = self.storage.get(USER_ID_KEY).await?;
        let email = self.storage.get(USER_EMAIL_KEY).await?;

        Ok(user_id
            .filter(|v| !v.is_empty())
            .zip(email.filter(|v| !v.is_empty())))
    }
}
