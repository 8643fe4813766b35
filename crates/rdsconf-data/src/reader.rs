//! Full reads of the instance's configuration surface.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::ConfigurationSnapshot;
use crate::procedures::ProcedureClient;

/// Read every supported setting. A read either fully succeeds or fails; no
/// partial snapshot is ever returned.
///
/// # Errors
///
/// Returns an error if the procedure call fails or any row is malformed.
#[instrument(name = "configuration.read", skip(client))]
pub async fn read_configuration<P>(
    client: &P,
    include_descriptions: bool,
) -> Result<ConfigurationSnapshot>
where
    P: ProcedureClient + ?Sized,
{
    let rows = client.show_configuration().await?;
    let snapshot = ConfigurationSnapshot::from_rows(rows, include_descriptions)?;
    debug!(settings = snapshot.len(), "read remote configuration");
    Ok(snapshot)
}
