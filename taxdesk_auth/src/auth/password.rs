//! Password strength policy and Argon2id hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::fmt;

use super::errors::{AuthError, AuthResult, WEAK_PASSWORD_MESSAGE};

/// Minimum password length, in characters
pub const MIN_PASSWORD_LEN: usize = 8;

/// Argon2id memory cost in KiB
pub const DEFAULT_MEMORY_KIB: u32 = 19_456;

/// Argon2id iteration count
pub const DEFAULT_ITERATIONS: u32 = 2;

/// Argon2id lanes
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Check a candidate password against the strength policy.
///
/// The password needs at least [`MIN_PASSWORD_LEN`] characters, one ASCII
/// lowercase letter, one ASCII uppercase letter, one ASCII digit and one
/// character that is neither an ASCII letter nor a digit. Underscore counts
/// as special. Line terminators are not accepted anywhere in the password.
pub fn validate_password(password: &str) -> AuthResult<()> {
    let weak = || Err(AuthError::WeakPassword(WEAK_PASSWORD_MESSAGE.to_string()));

    if password
        .chars()
        .any(|c| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
    {
        return weak();
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return weak();
    }

    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if !has_lowercase || !has_uppercase || !has_digit || !has_special {
        return weak();
    }

    Ok(())
}

/// Cost parameters and optional pepper for password hashing
#[derive(Clone)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    /// Server-side secret appended to every password before hashing
    pub pepper: Option<String>,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
            pepper: None,
        }
    }
}

impl fmt::Debug for HashingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashingConfig")
            .field("memory_kib", &self.memory_kib)
            .field("iterations", &self.iterations)
            .field("parallelism", &self.parallelism)
            .field("pepper", &self.pepper.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Argon2id password hasher
#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
    pepper: Option<String>,
}

impl CredentialHasher {
    /// Build a hasher from cost parameters
    ///
    /// # Errors
    ///
    /// * `AuthError::RegistrationFailed` - Cost parameters out of range
    pub fn new(config: &HashingConfig) -> AuthResult<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AuthError::RegistrationFailed(format!("invalid hashing parameters: {e}")))?;

        Ok(Self {
            params,
            pepper: config.pepper.clone(),
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn peppered(&self, password: &str) -> String {
        match &self.pepper {
            Some(pepper) => format!("{password}{pepper}"),
            None => password.to_string(),
        }
    }

    /// Hash a password with a fresh random salt, returning the PHC string
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Ok(self
            .argon2()
            .hash_password(self.peppered(password).as_bytes(), &salt)
            .map_err(|e| AuthError::RegistrationFailed(format!("password hashing failed: {e}")))?
            .to_string())
    }

    /// Check a password against a stored PHC hash.
    ///
    /// Cost parameters are read from the hash itself, so hashes created with
    /// older settings keep verifying. A hash that cannot be parsed never
    /// matches.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        self.argon2()
            .verify_password(self.peppered(password).as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal cost keeps the test suite fast.
    fn fast_hasher(pepper: Option<&str>) -> CredentialHasher {
        CredentialHasher::new(&HashingConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
            pepper: pepper.map(str::to_string),
        })
        .unwrap()
    }

    #[test]
    fn test_validate_password_accepts_strong() {
        assert!(validate_password("Str0ng!pw").is_ok());
        assert!(validate_password("Abcdef1_").is_ok(), "underscore is special");
        assert!(validate_password("Abcdef1 ").is_ok(), "space is special");
    }

    #[test]
    fn test_validate_password_rejects_each_missing_class() {
        for weak in [
            "Sh0rt!",      // too short
            "alllower1!",  // no uppercase
            "ALLUPPER1!",  // no lowercase
            "NoDigits!!",  // no digit
            "NoSpecial12", // no special
            "",
        ] {
            assert!(
                matches!(validate_password(weak), Err(AuthError::WeakPassword(_))),
                "{weak:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_password_rejects_line_terminators() {
        assert!(validate_password("Good1!pass\n").is_err());
        assert!(validate_password("Good1!\u{2028}pass").is_err());
    }

    #[test]
    fn test_validate_password_counts_characters_not_bytes() {
        // Seven characters, more than eight bytes.
        assert!(validate_password("Aé1!éée").is_err());
        assert!(validate_password("Aé1!ééée").is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher(None);
        let hash = hasher.hash("Secur3!pass").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Secur3!pass", &hash));
        assert!(!hasher.verify("Secur3!pasS", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = fast_hasher(None);
        let a = hasher.hash("Secur3!pass").unwrap();
        let b = hasher.hash("Secur3!pass").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_pepper_must_match() {
        let peppered = fast_hasher(Some("pepper-one"));
        let hash = peppered.hash("Secur3!pass").unwrap();

        assert!(peppered.verify("Secur3!pass", &hash));
        assert!(!fast_hasher(Some("pepper-two")).verify("Secur3!pass", &hash));
        assert!(!fast_hasher(None).verify("Secur3!pass", &hash));
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(!fast_hasher(None).verify("Secur3!pass", "not-a-phc-string"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = CredentialHasher::new(&HashingConfig {
            parallelism: 0,
            ..HashingConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_pepper() {
        let config = HashingConfig {
            pepper: Some("top-secret".to_string()),
            ..HashingConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
