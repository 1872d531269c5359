//! Logger setup.
//!
//! Library crates log through the `log` facade. A host (or a test) installs a
//! `tracing-subscriber` formatter once, and `log` records are bridged into it.

use std::error::Error;

use tracing_subscriber::EnvFilter;

/// Error returned when the global subscriber could not be installed.
pub type LoggerError = Box<dyn Error + Send + Sync + 'static>;

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins over `default_directive` when it is set. Fails if a global
/// subscriber or `log` logger is already installed.
pub fn init(default_directive: &str) -> Result<(), LoggerError> {
    install(default_directive, false)
}

/// Installs a debug-level subscriber, ignoring the error if one already exists.
///
/// Meant for tests, where every test in a binary races to install it.
pub fn init_for_tests() {
    let _ = install("debug", true);
}

fn install(default_directive: &str, test_writer: bool) -> Result<(), LoggerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if test_writer {
        builder.with_test_writer().try_init()?;
    } else {
        builder.try_init()?;
    }

    log::debug!("Logger initialised with default directive {default_directive}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        init_for_tests();
        assert!(init("info").is_err());
    }
}
