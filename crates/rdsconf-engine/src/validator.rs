//! Plan-time check that every desired name is supported by the instance.
//!
//! The check reads with descriptions so a failure can list every valid
//! setting; it never mutates the instance.

use std::fmt::Write as _;

use rdsconf_data::{ConfigurationSnapshot, DesiredConfiguration, ProcedureClient, read_configuration};
use tracing::{info, instrument, warn};

use crate::error::{EngineError, EngineResult};

/// Fail when any desired name is absent from the instance's supported set.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedSettings`] listing the unknown names and
/// every valid setting, or the read failure if introspection fails.
#[instrument(name = "configuration.validate", skip_all, fields(settings = desired.len()))]
pub async fn validate_desired<P>(client: &P, desired: &DesiredConfiguration) -> EngineResult<()>
where
    P: ProcedureClient + ?Sized,
{
    let supported = read_configuration(client, true).await?;
    let unknown: Vec<String> = desired
        .names()
        .filter(|name| !supported.contains(name))
        .map(str::to_string)
        .collect();

    if unknown.is_empty() {
        info!("desired configuration uses supported settings only");
        return Ok(());
    }

    warn!(unknown = ?unknown, "desired configuration references unsupported settings");
    let message = unsupported_settings_message(&unknown, &supported);
    Err(EngineError::UnsupportedSettings { unknown, message })
}

/// Render the unknown names followed by a numbered listing of valid settings.
#[must_use]
pub fn unsupported_settings_message(unknown: &[String], supported: &ConfigurationSnapshot) -> String {
    let mut message = format!(
        "Unsupported RDS configuration settings: \"{}\"\n\nValid settings are:\n",
        unknown.join("\", \"")
    );
    for (index, setting) in supported.sorted().into_iter().enumerate() {
        let _ = writeln!(
            message,
            "{:>3}. \"{}\": {}",
            index + 1,
            setting.name,
            setting.description.as_deref().unwrap_or_default()
        );
    }
    message
}
