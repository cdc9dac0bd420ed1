//! Tracing subscriber setup.
//!
//! Events go to stderr so stdout carries only the report. `RUST_LOG` takes
//! precedence over `--log-level`.

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

use crate::error::AppError;

pub fn init_logging(level: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| AppError::config(format!("Invalid log level '{level}': {e}")))?;

    let formatter = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let subscriber = Registry::default().with(filter).with(formatter);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::config(format!("Failed to install log subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_level() {
        // RUST_LOG would take precedence over the argument.
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(init_logging("fy=notalevel").is_err());
        }
    }
}
