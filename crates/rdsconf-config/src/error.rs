//! Error types for client configuration.

use thiserror::Error;

/// Errors raised while resolving client settings into a `ClientContext`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No endpoint was configured explicitly or through the environment.
    #[error("missing endpoint configuration")]
    MissingEndpoint,
    /// No username was configured explicitly or through the environment.
    #[error("missing username configuration")]
    MissingUsername,
    /// A field carried a value that failed validation.
    #[error("invalid configuration field")]
    InvalidField {
        /// Name of the offending option.
        field: &'static str,
        /// Offending value when it is safe to echo.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

impl ConfigError {
    /// Short, operator-facing summary of the failure.
    #[must_use]
    pub const fn summary(&self) -> &'static str {
        match self {
            Self::MissingEndpoint => "Missing endpoint configuration",
            Self::MissingUsername => "Missing username configuration",
            Self::InvalidField { .. } => "Invalid connection configuration",
        }
    }

    /// Long-form remediation text for the failure.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::MissingEndpoint => format!(
                "MySQL endpoint must be specified either in provider configuration or {} environment variable.",
                crate::defaults::ENV_ENDPOINT
            ),
            Self::MissingUsername => format!(
                "MySQL username must be specified either in provider configuration or {} environment variable.",
                crate::defaults::ENV_USERNAME
            ),
            Self::InvalidField {
                field,
                value,
                reason,
            } => value.as_ref().map_or_else(
                || format!("option '{field}' is invalid: {reason}"),
                |value| format!("option '{field}' has invalid value '{value}': {reason}"),
            ),
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_name_their_environment_variable() {
        assert_eq!(
            ConfigError::MissingEndpoint.summary(),
            "Missing endpoint configuration"
        );
        assert!(ConfigError::MissingEndpoint.detail().contains("MYSQL_ENDPOINT"));
        assert!(ConfigError::MissingUsername.detail().contains("MYSQL_USERNAME"));
    }

    #[test]
    fn invalid_field_detail_includes_value_when_present() {
        let err = ConfigError::InvalidField {
            field: "tls",
            value: Some("maybe".to_string()),
            reason: "must be one of true, false, skip-verify",
        };
        assert_eq!(err.to_string(), "invalid configuration field");
        assert!(err.detail().contains("'maybe'"));

        let redacted = ConfigError::InvalidField {
            field: "port",
            value: None,
            reason: "out of range",
        };
        assert_eq!(redacted.detail(), "option 'port' is invalid: out of range");
    }
}
