//! # Design
//!
//! - One taxonomy for every engine operation: configuration, connection,
//!   query, and validation failures.
//! - Keep error messages constant while carrying context fields; the
//!   validation message is the exception because it carries the remediation.

use rdsconf_config::ConfigError;
use rdsconf_data::DataError;
use thiserror::Error;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Client options were missing or invalid.
    #[error("client configuration failed")]
    Config {
        /// Source configuration error.
        #[from]
        source: ConfigError,
    },
    /// No connection could be established within the connect budget.
    #[error("database connection failed")]
    Connection {
        /// Source data-layer error.
        source: DataError,
    },
    /// A procedure call failed or returned malformed rows.
    #[error("configuration query failed")]
    Query {
        /// Source data-layer error.
        source: DataError,
    },
    /// The desired configuration names settings the instance does not support.
    #[error("{message}")]
    UnsupportedSettings {
        /// Unrecognized names, in declaration order.
        unknown: Vec<String>,
        /// Full message listing unknown names and every valid setting.
        message: String,
    },
    /// The desired configuration itself was malformed.
    #[error("desired configuration was invalid")]
    InvalidDesired {
        /// Source data-layer error.
        source: DataError,
    },
    /// Import could not read the instance.
    #[error("{message}")]
    ImportFailed {
        /// Summary and detail of the failure.
        message: String,
        /// Underlying engine error.
        source: Box<EngineError>,
    },
}

impl From<DataError> for EngineError {
    fn from(source: DataError) -> Self {
        match source {
            DataError::Connect { .. } => Self::Connection { source },
            DataError::InvalidDesired { .. } => Self::InvalidDesired { source },
            DataError::QueryFailed { .. } | DataError::MalformedRow { .. } => {
                Self::Query { source }
            }
        }
    }
}
