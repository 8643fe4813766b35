//! Field parsers shared by the settings resolver.

use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Trim the value and drop it when nothing is left.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Parse a TCP port. `0` means "use the driver default" and yields `None`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not an integer in
/// `0..=65535`.
pub fn parse_port(value: &str) -> ConfigResult<Option<u16>> {
    let port = value
        .trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidField {
            field: "port",
            value: Some(value.to_string()),
            reason: "must be an integer",
        })?;

    if port == 0 {
        return Ok(None);
    }

    u16::try_from(port)
        .map(Some)
        .map_err(|_| ConfigError::InvalidField {
            field: "port",
            value: Some(value.to_string()),
            reason: "must be between 1 and 65535",
        })
}

/// Parse a connect timeout expressed in whole seconds.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not a non-negative
/// integer.
pub fn parse_connect_timeout(value: &str) -> ConfigResult<Duration> {
    let seconds = value
        .trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidField {
            field: "connect_timeout",
            value: Some(value.to_string()),
            reason: "must be an integer number of seconds",
        })?;

    u64::try_from(seconds)
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidField {
            field: "connect_timeout",
            value: Some(value.to_string()),
            reason: "must be at least 0",
        })
}
