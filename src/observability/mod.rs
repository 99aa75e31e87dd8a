//! Logging setup.
//!
//! The crate only emits `tracing` events. Hosts without their own subscriber
//! can enable the `subscriber` feature:
//!
//! ```toml
//! mod-overlay = { version = "0.1", features = ["subscriber"] }
//! ```
//!
//! ```rust,ignore
//! mod_overlay::observability::init_tracing("mod_overlay=info")?;
//! ```

#[cfg(feature = "subscriber")]
use tracing_subscriber::EnvFilter;
#[cfg(feature = "subscriber")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "subscriber")]
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("Failed to init subscriber: {0}")]
    Init(String),
}

/// Installs a global console subscriber.
///
/// `RUST_LOG` takes precedence over `default_directive`.
#[cfg(feature = "subscriber")]
#[cfg_attr(docsrs, doc(cfg(feature = "subscriber")))]
pub fn init_tracing(default_directive: &str) -> Result<(), ObservabilityError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            ObservabilityError::InvalidFilter {
                directive: default_directive.to_string(),
                message: e.to_string(),
            }
        })?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ObservabilityError::Init(e.to_string()))
}
