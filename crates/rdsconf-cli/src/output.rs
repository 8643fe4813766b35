//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use rdsconf_data::DesiredConfiguration;
use rdsconf_engine::{DataSourceState, Diagnostics, ResourceState};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const UNSET: &str = "<unset>";

#[derive(Serialize)]
struct ResourceReport<'a> {
    #[serde(flatten)]
    state: &'a ResourceState,
    #[serde(skip_serializing_if = "Option::is_none")]
    drift: Option<Vec<&'a str>>,
}

pub(crate) fn render_data_source(state: &DataSourceState, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(state),
        OutputFormat::Table => {
            let width = name_width(state.settings.iter().map(|setting| setting.name.as_str()));
            let mut out = format!("read at: {}\n", state.id);
            let _ = writeln!(out, "{:<width$} {:>10} DESCRIPTION", "NAME", "VALUE");
            for setting in &state.settings {
                let _ = writeln!(
                    out,
                    "{:<width$} {:>10} {}",
                    setting.name,
                    format_value(setting.value),
                    setting.description.as_deref().unwrap_or_default()
                );
            }
            Ok(out)
        }
    }
}

pub(crate) fn render_resource_state(
    state: &ResourceState,
    desired: Option<&DesiredConfiguration>,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&ResourceReport {
            state,
            drift: desired.map(|desired| drifted(state, desired)),
        }),
        OutputFormat::Table => {
            let width = name_width(state.settings.iter().map(|setting| setting.name.as_str()));
            let mut out = format!("id: {}\n", state.id.as_deref().unwrap_or("<unmanaged>"));
            match desired {
                None => {
                    let _ = writeln!(out, "{:<width$} {:>10}", "NAME", "VALUE");
                    for setting in &state.settings {
                        let _ = writeln!(
                            out,
                            "{:<width$} {:>10}",
                            setting.name,
                            format_value(setting.value)
                        );
                    }
                }
                Some(desired) => {
                    let _ = writeln!(
                        out,
                        "{:<width$} {:>10} {:>10} STATUS",
                        "NAME", "VALUE", "DESIRED"
                    );
                    for setting in &state.settings {
                        let wanted = desired.get(&setting.name);
                        let status = match wanted {
                            None => "unmanaged",
                            Some(value) if setting.value == Some(value) => "in-sync",
                            Some(_) => "drift",
                        };
                        let _ = writeln!(
                            out,
                            "{:<width$} {:>10} {:>10} {status}",
                            setting.name,
                            format_value(setting.value),
                            wanted.map_or_else(|| "-".to_string(), |value| value.to_string()),
                        );
                    }
                }
            }
            Ok(out)
        }
    }
}

/// Each diagnostic as `severity: summary` with its detail on the following lines.
pub(crate) fn render_diagnostics(diagnostics: &Diagnostics) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics.iter() {
        let _ = writeln!(out, "{diagnostic}");
        if !diagnostic.detail.is_empty() {
            let _ = writeln!(out, "\n{}", diagnostic.detail);
        }
    }
    out
}

/// Desired names whose observed value differs or that the instance lacks.
pub(crate) fn drifted<'a>(state: &ResourceState, desired: &'a DesiredConfiguration) -> Vec<&'a str> {
    desired
        .iter()
        .filter(|(name, value)| state.value(name) != Some(Some(*value)))
        .map(|(name, _)| name)
        .collect()
}

fn format_value(value: Option<i64>) -> String {
    value.map_or_else(|| UNSET.to_string(), |value| value.to_string())
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(str::len).max().unwrap_or_default().max("NAME".len())
}

fn to_json(value: &impl Serialize) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map(|text| text + "\n")
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}
