//! Error types for the data access layer.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

/// Result alias for data layer operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised by the data access layer.
#[derive(Debug)]
pub enum DataError {
    /// No verified connection could be established within the budget.
    Connect {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Configured connect budget.
        timeout: Duration,
        /// Failure reported by the last attempt, if it finished in time.
        source: Option<sqlx::Error>,
    },
    /// A procedure call failed.
    QueryFailed {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying SQL error.
        source: sqlx::Error,
    },
    /// A row returned by the introspection procedure did not match its shape.
    MalformedRow {
        /// Zero-based position of the row in the result set.
        row: usize,
        /// Machine-readable reason for the rejection.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// A desired configuration could not be built.
    InvalidDesired {
        /// Machine-readable reason for the rejection.
        reason: &'static str,
        /// Setting name involved, when there is one.
        name: Option<String>,
    },
}

impl Display for DataError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { .. } => formatter.write_str("database connection failed"),
            Self::QueryFailed { .. } => formatter.write_str("database operation failed"),
            Self::MalformedRow { .. } => formatter.write_str("configuration row was malformed"),
            Self::InvalidDesired { .. } => formatter.write_str("desired configuration was invalid"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connect { source, .. } => source.as_ref().map(|err| err as &(dyn Error + 'static)),
            Self::QueryFailed { source, .. } => Some(source),
            Self::MalformedRow { .. } | Self::InvalidDesired { .. } => None,
        }
    }
}

impl DataError {
    pub(crate) const fn query(operation: &'static str, source: sqlx::Error) -> Self {
        Self::QueryFailed { operation, source }
    }

    /// Human-readable description including context fields and the source chain.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Connect {
                attempts,
                timeout,
                source,
            } => {
                let base = format!(
                    "no connection could be established after {attempts} attempt(s) within {}s",
                    timeout.as_secs()
                );
                match source {
                    Some(source) => format!("{base}: {source}"),
                    None => format!("{base}: the last attempt did not complete in time"),
                }
            }
            Self::QueryFailed { operation, source } => format!("{operation}: {source}"),
            Self::MalformedRow { row, reason, value } => match value {
                Some(value) => format!("row {row}: {reason} (got '{value}')"),
                None => format!("row {row}: {reason}"),
            },
            Self::InvalidDesired { reason, name } => match name {
                Some(name) => format!("{reason}: \"{name}\""),
                None => (*reason).to_string(),
            },
        }
    }
}
