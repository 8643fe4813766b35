//! Lifecycle of the managed configuration resource.
//!
//! The instance exposes one global configuration object, so every managed
//! state carries the same identity. Delete only forgets local tracking; the
//! instance keeps whatever values were last applied.

use rdsconf_data::{
    ConfigurationSnapshot, Connector, DesiredConfiguration, apply_configuration,
    read_configuration,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::SharedConnections;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{EngineError, EngineResult};
use crate::validator::validate_desired;

/// Identity assigned to every managed configuration.
pub const RESOURCE_ID: &str = "singleton";

const DELETE_SUMMARY: &str = "RDS configuration is not actually deleted or modified in RDS";
const DELETE_DETAIL: &str = "Removing an RDS configuration removes it from local state, but does \
    not delete, change, or revert anything in the RDS instance. Any previously configured \
    settings will persist with their most recent values.";

/// One setting as tracked in resource state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingState {
    /// Setting name.
    pub name: String,
    /// Observed value; `None` when unset on the instance.
    pub value: Option<i64>,
}

/// Locally tracked state of the configuration resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Identity; `None` while unmanaged.
    pub id: Option<String>,
    /// Observed settings ordered by name.
    pub settings: Vec<SettingState>,
}

impl ResourceState {
    fn observed(id: Option<String>, snapshot: ConfigurationSnapshot) -> Self {
        let settings = snapshot
            .into_sorted()
            .into_iter()
            .map(|setting| SettingState {
                name: setting.name,
                value: setting.value,
            })
            .collect();
        Self { id, settings }
    }

    /// Whether the resource is currently tracked.
    #[must_use]
    pub const fn is_managed(&self) -> bool {
        self.id.is_some()
    }

    /// Observed value for a setting.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<Option<i64>> {
        self.settings
            .iter()
            .find(|setting| setting.name == name)
            .map(|setting| setting.value)
    }
}

/// Orchestrates validate, apply, read, delete, and import for one resource.
pub struct ConfigurationResource<C: Connector> {
    connections: SharedConnections<C>,
}

impl<C: Connector> ConfigurationResource<C> {
    /// Resource backed by the shared connection manager.
    #[must_use]
    pub const fn new(connections: SharedConnections<C>) -> Self {
        Self { connections }
    }

    /// Plan-time check of the desired names against the instance.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedSettings`] for unknown names, or the
    /// connection/read failure.
    #[instrument(name = "resource.validate", skip_all)]
    pub async fn validate(&self, desired: &DesiredConfiguration) -> EngineResult<()> {
        let client = self.connections.acquire().await?;
        validate_desired(&client, desired).await
    }

    /// Validate, apply, and re-read the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first failure. Settings applied before a mutation failure
    /// stay applied; running `create` again is safe.
    #[instrument(name = "resource.create", skip_all, fields(settings = desired.len()))]
    pub async fn create(&self, desired: &DesiredConfiguration) -> EngineResult<ResourceState> {
        self.apply(desired).await
    }

    /// Same as [`Self::create`]; the instance holds one configuration object.
    ///
    /// # Errors
    ///
    /// See [`Self::create`].
    #[instrument(name = "resource.update", skip_all, fields(settings = desired.len()))]
    pub async fn update(&self, desired: &DesiredConfiguration) -> EngineResult<ResourceState> {
        self.apply(desired).await
    }

    async fn apply(&self, desired: &DesiredConfiguration) -> EngineResult<ResourceState> {
        let client = self.connections.acquire().await?;
        validate_desired(&client, desired).await?;
        apply_configuration(&client, desired).await?;
        let snapshot = read_configuration(&client, false).await?;
        info!(settings = desired.len(), "applied desired configuration");
        Ok(ResourceState::observed(
            Some(RESOURCE_ID.to_string()),
            snapshot,
        ))
    }

    /// Re-read the live configuration, surfacing drift as-is.
    ///
    /// # Errors
    ///
    /// Returns the connection or read failure.
    #[instrument(name = "resource.read", skip_all)]
    pub async fn read(&self, current: &ResourceState) -> EngineResult<ResourceState> {
        let client = self.connections.acquire().await?;
        let snapshot = read_configuration(&client, false).await?;
        Ok(ResourceState::observed(current.id.clone(), snapshot))
    }

    /// Forget the resource locally. Always succeeds and always warns that the
    /// instance is untouched.
    #[allow(clippy::unused_self)]
    #[instrument(name = "resource.delete", skip_all)]
    pub fn delete(&self, state: &mut ResourceState) -> Diagnostics {
        state.id = None;
        warn!("configuration removed from local state only; instance values persist");
        [Diagnostic::warning(DELETE_SUMMARY, DELETE_DETAIL)]
            .into_iter()
            .collect()
    }

    /// Adopt the instance's current configuration as managed state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ImportFailed`] carrying the summary and detail of
    /// the underlying failure.
    #[instrument(name = "resource.import", skip_all)]
    pub async fn import(&self) -> EngineResult<ResourceState> {
        let snapshot = match self.read_described().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                let message = Diagnostic::from(&err).message();
                return Err(EngineError::ImportFailed {
                    message,
                    source: Box::new(err),
                });
            }
        };
        info!(settings = snapshot.len(), "imported live configuration");
        Ok(ResourceState::observed(
            Some(RESOURCE_ID.to_string()),
            snapshot.without_descriptions(),
        ))
    }

    async fn read_described(&self) -> EngineResult<ConfigurationSnapshot> {
        let client = self.connections.acquire().await?;
        Ok(read_configuration(&client, true).await?)
    }
}
