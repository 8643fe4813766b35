use rdsconf_data::{Connector, DesiredConfiguration};
use rdsconf_engine::{RESOURCE_ID, ResourceState};

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliResult};
use crate::output::{render_data_source, render_diagnostics, render_resource_state};

pub(crate) async fn handle_show<C: Connector>(
    ctx: &AppContext<C>,
    format: OutputFormat,
) -> CliResult<String> {
    let state = ctx.data_source().read().await?;
    render_data_source(&state, format)
}

pub(crate) async fn handle_validate<C: Connector>(
    ctx: &AppContext<C>,
    desired: &DesiredConfiguration,
) -> CliResult<String> {
    ctx.resource().validate(desired).await?;
    Ok(format!(
        "Desired configuration is valid ({} setting(s)).\n",
        desired.len()
    ))
}

pub(crate) async fn handle_apply<C: Connector>(
    ctx: &AppContext<C>,
    desired: &DesiredConfiguration,
    format: OutputFormat,
) -> CliResult<String> {
    let state = ctx.resource().create(desired).await?;
    render_resource_state(&state, Some(desired), format)
}

pub(crate) async fn handle_read<C: Connector>(
    ctx: &AppContext<C>,
    desired: Option<&DesiredConfiguration>,
    format: OutputFormat,
) -> CliResult<String> {
    let managed = ResourceState {
        id: Some(RESOURCE_ID.to_string()),
        settings: Vec::new(),
    };
    let state = ctx.resource().read(&managed).await?;
    render_resource_state(&state, desired, format)
}

pub(crate) async fn handle_import<C: Connector>(
    ctx: &AppContext<C>,
    format: OutputFormat,
) -> CliResult<String> {
    let state = ctx.resource().import().await?;
    render_resource_state(&state, None, format)
}

pub(crate) fn handle_forget<C: Connector>(ctx: &AppContext<C>) -> String {
    let mut state = ResourceState {
        id: Some(RESOURCE_ID.to_string()),
        settings: Vec::new(),
    };
    let diagnostics = ctx.resource().delete(&mut state);
    render_diagnostics(&diagnostics)
}
