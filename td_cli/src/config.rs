//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::path::PathBuf;
use taxdesk_auth::auth::password::{DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM};
use taxdesk_auth::{
    HashingConfig,
    db::{DatabaseConfig, DatabaseConfigError},
};

/// Default session file, relative to the home directory
pub const DEFAULT_SESSION_FILE: &str = ".taxdesk/session.json";

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Password hashing configuration
    pub hashing: HashingConfig,
    /// Where the client-held session identifiers live
    pub session_file: PathBuf,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `session_file_override` - Optional session file override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is present but invalid
    pub fn from_env(
        database_url_override: Option<String>,
        session_file_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let database_url = database_url_override
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| DatabaseConfig::development().database_url);

        let database = DatabaseConfig::with_url_from_env(database_url)?;

        let hashing = HashingConfig {
            memory_kib: parse_env_or("ARGON2_MEMORY_KIB", DEFAULT_MEMORY_KIB)?,
            iterations: parse_env_or("ARGON2_ITERATIONS", DEFAULT_ITERATIONS)?,
            parallelism: parse_env_or("ARGON2_PARALLELISM", DEFAULT_PARALLELISM)?,
            pepper: std::env::var("PASSWORD_PEPPER").ok(),
        };

        let session_file = session_file_override
            .or_else(|| std::env::var("TAXDESK_SESSION_FILE").ok().map(PathBuf::from))
            .unwrap_or_else(default_session_file);

        Ok(CliConfig {
            database,
            hashing,
            session_file,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hashing.pepper.as_ref().is_some_and(|p| p.len() < 16) {
            return Err(ConfigError::Invalid {
                var: "PASSWORD_PEPPER".to_string(),
                reason: "Must be at least 16 characters (64-bit security)".to_string(),
            });
        }

        // Argon2 needs at least 8 KiB per lane.
        if self.hashing.parallelism == 0
            || self.hashing.memory_kib < self.hashing.parallelism.saturating_mul(8)
        {
            return Err(ConfigError::Invalid {
                var: "ARGON2_MEMORY_KIB".to_string(),
                reason: format!(
                    "Must be at least 8 KiB per lane ({} lanes)",
                    self.hashing.parallelism
                ),
            });
        }

        if self.hashing.iterations == 0 {
            return Err(ConfigError::Invalid {
                var: "ARGON2_ITERATIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    self.database.max_connections
                ),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseConfigError),
}

fn default_session_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(DEFAULT_SESSION_FILE)
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Could not parse {value:?}"),
        }),
        Err(_) => Ok(default),
    }
}
