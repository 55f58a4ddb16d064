//! Database configuration module.
//!
//! Provides configuration structures for database connection management.

use std::env;
use std::time::Duration;

use super::timeouts::DEFAULT_QUERY_TIMEOUT;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,

    /// Per-query timeout in seconds
    pub query_timeout_secs: u64,
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum DatabaseConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    ///
    /// plus the pool settings read by [`DatabaseConfig::with_url_from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is not set or a numeric variable
    /// does not parse
    pub fn from_env() -> Result<Self, DatabaseConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| DatabaseConfigError::Missing("DATABASE_URL"))?;
        Self::with_url_from_env(database_url)
    }

    /// Use `database_url` and read the pool settings from the environment
    ///
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 10)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 1)
    /// - `DB_CONNECTION_TIMEOUT`: Connection timeout in seconds (default: 10)
    /// - `DB_IDLE_TIMEOUT`: Idle timeout in seconds (default: 600)
    /// - `DB_MAX_LIFETIME`: Max lifetime in seconds (default: 1800)
    /// - `DB_QUERY_TIMEOUT`: Per-query timeout in seconds (default: 5)
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse
    pub fn with_url_from_env(database_url: String) -> Result<Self, DatabaseConfigError> {
        let defaults = Self::development();

        Ok(Self {
            database_url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connection_timeout_secs: parse_env(
                "DB_CONNECTION_TIMEOUT",
                defaults.connection_timeout_secs,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT", defaults.idle_timeout_secs)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME", defaults.max_lifetime_secs)?,
            query_timeout_secs: parse_env("DB_QUERY_TIMEOUT", defaults.query_timeout_secs)?,
        })
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/taxdesk` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/taxdesk".to_string(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT.as_secs(),
        }
    }

    /// Per-query timeout as a `Duration`
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn parse_env<T>(var: &'static str, default: T) -> Result<T, DatabaseConfigError>
where
    T: std::str::FromStr,
{
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| DatabaseConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = DatabaseConfig::default();
        assert!(config.database_url.starts_with("postgres://"));
        assert!(config.min_connections <= config.max_connections);
        assert_eq!(config.query_timeout(), DEFAULT_QUERY_TIMEOUT);
    }

    #[test]
    #[serial_test::serial]
    fn test_with_url_from_env_reads_pool_settings() {
        // SAFETY: serialised with every other test touching these variables.
        unsafe {
            env::set_var("DB_MAX_CONNECTIONS", "3");
            env::set_var("DB_QUERY_TIMEOUT", "9");
        }

        let config = DatabaseConfig::with_url_from_env("postgres://db/test".to_string());

        unsafe {
            env::remove_var("DB_MAX_CONNECTIONS");
            env::remove_var("DB_QUERY_TIMEOUT");
        }

        let config = config.unwrap();
        assert_eq!(config.database_url, "postgres://db/test");
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.query_timeout(), Duration::from_secs(9));
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    #[serial_test::serial]
    fn test_with_url_from_env_rejects_garbage() {
        unsafe { env::set_var("DB_MIN_CONNECTIONS", "lots") };
        let result = DatabaseConfig::with_url_from_env("postgres://db/test".to_string());
        unsafe { env::remove_var("DB_MIN_CONNECTIONS") };

        assert!(matches!(
            result,
            Err(DatabaseConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u32 = parse_env("TAXDESK_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
