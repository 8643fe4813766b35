//! Application of desired settings, one procedure call per setting.
//!
//! There is no cross-setting transaction: the first failure stops the run and
//! settings applied before it stay applied. Each call is idempotent, so the
//! caller recovers by running the whole apply again.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::DesiredConfiguration;
use crate::procedures::ProcedureClient;

/// Apply every desired setting in name order.
///
/// # Errors
///
/// Returns the first procedure failure; remaining settings are not attempted.
#[instrument(name = "configuration.apply", skip_all, fields(settings = desired.len()))]
pub async fn apply_configuration<P>(client: &P, desired: &DesiredConfiguration) -> Result<()>
where
    P: ProcedureClient + ?Sized,
{
    for (name, value) in desired.iter() {
        client.set_configuration(name, value).await?;
        debug!(setting = name, value, "applied configuration setting");
    }
    Ok(())
}
