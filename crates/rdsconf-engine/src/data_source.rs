//! Read-only listing of every supported setting with its description.

use chrono::Utc;
use rdsconf_data::{Connector, Setting, read_configuration};
use serde::Serialize;
use tracing::instrument;

use crate::SharedConnections;
use crate::error::EngineResult;

/// Result of a data source read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSourceState {
    /// Read timestamp in Unix seconds; changes on every refresh.
    pub id: String,
    /// Every supported setting, ordered by name, with descriptions.
    pub settings: Vec<Setting>,
}

/// Read-only view of the instance configuration.
pub struct ConfigurationDataSource<C: Connector> {
    connections: SharedConnections<C>,
}

impl<C: Connector> ConfigurationDataSource<C> {
    /// Data source backed by the shared connection manager.
    #[must_use]
    pub const fn new(connections: SharedConnections<C>) -> Self {
        Self { connections }
    }

    /// Read every setting with descriptions.
    ///
    /// # Errors
    ///
    /// Returns the connection or read failure.
    #[instrument(name = "data_source.read", skip_all)]
    pub async fn read(&self) -> EngineResult<DataSourceState> {
        let client = self.connections.acquire().await?;
        let snapshot = read_configuration(&client, true).await?;
        Ok(DataSourceState {
            id: Utc::now().timestamp().to_string(),
            settings: snapshot.into_sorted(),
        })
    }
}
