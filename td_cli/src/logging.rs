//! Structured logging configuration.
//!
//! Library code logs through the `log` facade; those records are bridged
//! into the `tracing` subscriber installed here.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn,sqlx=warn";

/// Initialize structured logging
///
/// Log levels come from `RUST_LOG` (default [`DEFAULT_FILTER`]). Output goes to
/// stderr so command output on stdout stays machine-readable.
///
/// # Example
///
/// ```no_run
/// use td_cli::logging;
///
/// logging::init();
/// tracing::info!("CLI starting");
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

/// Log security event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of security event
/// * `subject` - Email or user id the event concerns, if known
/// * `message` - Event message
///
/// # Example
///
/// ```
/// use td_cli::logging::log_security_event;
///
/// log_security_event("failed_login", Some("asha@example.com"), "Invalid credentials");
/// ```
pub fn log_security_event(event_type: &str, subject: Option<&str>, message: &str) {
    tracing::warn!(
        event_type = event_type,
        subject = subject,
        "SECURITY: {}",
        message
    );
}
