//! Shared connection context and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use anyhow::anyhow;
use rdsconf_data::Connector;
use rdsconf_engine::{
    ConfigurationDataSource, ConfigurationResource, Diagnostic, EngineError, SharedConnections,
};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<EngineError> for CliError {
    fn from(error: EngineError) -> Self {
        let message = Diagnostic::from(&error).message();
        match error {
            EngineError::Config { .. }
            | EngineError::UnsupportedSettings { .. }
            | EngineError::InvalidDesired { .. } => Self::validation(message),
            EngineError::Connection { .. }
            | EngineError::Query { .. }
            | EngineError::ImportFailed { .. } => Self::Failure(anyhow!(message)),
        }
    }
}

/// Connections shared by every handler of one invocation.
pub(crate) struct AppContext<C: Connector> {
    pub(crate) connections: SharedConnections<C>,
}

impl<C: Connector> AppContext<C> {
    pub(crate) const fn new(connections: SharedConnections<C>) -> Self {
        Self { connections }
    }

    pub(crate) fn resource(&self) -> ConfigurationResource<C> {
        ConfigurationResource::new(Arc::clone(&self.connections))
    }

    pub(crate) fn data_source(&self) -> ConfigurationDataSource<C> {
        ConfigurationDataSource::new(Arc::clone(&self.connections))
    }
}
