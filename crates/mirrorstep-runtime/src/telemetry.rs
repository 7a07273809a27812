//! Logging setup for binaries
//!
//! Library crates only emit `tracing` events. A binary calls
//! [`init_logging`] once at startup to install a subscriber.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use mirrorstep_core::{MirrorError, MirrorResult};

/// Subscriber configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `"mirrorstep_runtime=debug"`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `config.filter`. Fails if a global
/// subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> MirrorResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| MirrorError::Logging(format!("bad filter {:?}: {}", config.filter, e)))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| MirrorError::Logging(e.to_string()))
}
