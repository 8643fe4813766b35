//! Argument parsing and command dispatch for `rdsconf`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use rdsconf_config::{ClientContext, ClientSettings, ProcessEnv};
use rdsconf_data::{Connector, DesiredConfiguration};
use rdsconf_engine::{EngineError, mysql_connections};
use rdsconf_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::debug;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{
    handle_apply, handle_forget, handle_import, handle_read, handle_show, handle_validate,
};

/// Parses CLI arguments, executes the requested command, and prints its
/// output. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    match dispatch(cli).await {
        Ok(output) => {
            print!("{output}");
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<String> {
    let context = ClientContext::from_sources(cli.connection.into_settings(), &ProcessEnv)
        .map_err(|err| CliError::from(EngineError::from(err)))?;
    debug!(command = command_label(&cli.command), "dispatching command");
    let ctx = AppContext::new(mysql_connections(&context));
    execute(&ctx, cli.command, cli.output).await
}

pub(crate) async fn execute<C: Connector>(
    ctx: &AppContext<C>,
    command: Command,
    format: OutputFormat,
) -> CliResult<String> {
    match command {
        Command::Show => handle_show(ctx, format).await,
        Command::Validate(args) => handle_validate(ctx, &args.desired()?).await,
        Command::Apply(args) => handle_apply(ctx, &args.desired()?, format).await,
        Command::Read(args) => {
            let desired = if args.settings.is_empty() {
                None
            } else {
                Some(desired_from(args.settings)?)
            };
            handle_read(ctx, desired.as_ref(), format).await
        }
        Command::Import => handle_import(ctx, format).await,
        Command::Forget => Ok(handle_forget(ctx)),
    }
}

#[derive(Parser)]
#[command(
    name = "rdsconf",
    about = "Validate, apply, and inspect RDS MySQL configuration settings"
)]
pub(crate) struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
    #[arg(
        long,
        global = true,
        env = "RDSCONF_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log level or filter directive; RUST_LOG takes precedence"
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "RDSCONF_LOG_FORMAT",
        value_parser = parse_log_format,
        default_value_t = LogFormat::infer(),
        help = "Log output format (json or pretty)"
    )]
    log_format: LogFormat,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

/// Connection flags; anything left unset falls back to the `MYSQL_*`
/// environment variables.
#[derive(Args, Default)]
pub(crate) struct ConnectionArgs {
    #[arg(long, global = true, help = "Instance hostname or IP [env: MYSQL_ENDPOINT]")]
    endpoint: Option<String>,
    #[arg(long, global = true, help = "Instance port, 0 for 3306 [env: MYSQL_PORT]")]
    port: Option<String>,
    #[arg(long, global = true, help = "Login user [env: MYSQL_USERNAME]")]
    username: Option<String>,
    #[arg(long, global = true, help = "Login password [env: MYSQL_PASSWORD]")]
    password: Option<String>,
    #[arg(
        long,
        global = true,
        help = "TLS mode: true, false, or skip-verify [env: MYSQL_TLS_CONFIG]"
    )]
    tls: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Authentication type: native or cleartext [env: MYSQL_AUTHENTICATION_TYPE]"
    )]
    authentication_type: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Connect budget in seconds, 0 for a single attempt [env: MYSQL_CONNECT_TIMEOUT]"
    )]
    connect_timeout: Option<String>,
}

impl ConnectionArgs {
    fn into_settings(self) -> ClientSettings {
        ClientSettings {
            endpoint: self.endpoint,
            port: self.port,
            username: self.username,
            password: self.password,
            tls: self.tls,
            authentication_type: self.authentication_type,
            connect_timeout: self.connect_timeout,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List every supported setting with its value and description.
    Show,
    /// Check that every named setting is supported, without changing anything.
    Validate(DesiredArgs),
    /// Validate, apply, and re-read the named settings.
    Apply(DesiredArgs),
    /// Read the live settings, optionally comparing them against desired values.
    Read(ReadArgs),
    /// Adopt the live configuration as managed state.
    Import,
    /// Stop managing the configuration; the instance keeps its values.
    Forget,
}

#[derive(Args)]
pub(crate) struct DesiredArgs {
    #[arg(
        required = true,
        value_parser = parse_setting,
        help = "Desired settings as name=value"
    )]
    settings: Vec<SettingArg>,
}

impl DesiredArgs {
    fn desired(self) -> CliResult<DesiredConfiguration> {
        desired_from(self.settings)
    }
}

#[derive(Args, Default)]
pub(crate) struct ReadArgs {
    #[arg(
        value_parser = parse_setting,
        help = "Desired settings to compare against, as name=value"
    )]
    settings: Vec<SettingArg>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SettingArg {
    name: String,
    value: i64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Show => "show",
        Command::Validate(_) => "validate",
        Command::Apply(_) => "apply",
        Command::Read(_) => "read",
        Command::Import => "import",
        Command::Forget => "forget",
    }
}

fn desired_from(settings: Vec<SettingArg>) -> CliResult<DesiredConfiguration> {
    DesiredConfiguration::new(
        settings
            .into_iter()
            .map(|setting| (setting.name, setting.value)),
    )
    .map_err(|err| CliError::from(EngineError::from(err)))
}

fn parse_setting(input: &str) -> Result<SettingArg, String> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| format!("setting '{input}' must be provided as name=value"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("setting '{input}' is missing a name"));
    }
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("setting '{name}' must have an integer value: {err}"))?;
    Ok(SettingArg {
        name: name.to_string(),
        value,
    })
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rdsconf").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn setting_arguments_parse_name_and_value() {
        assert_eq!(
            parse_setting("target delay=3600"),
            Ok(SettingArg {
                name: "target delay".to_string(),
                value: 3600,
            })
        );
        assert_eq!(
            parse_setting(" source delay = -1 "),
            Ok(SettingArg {
                name: "source delay".to_string(),
                value: -1,
            })
        );
    }

    #[test]
    fn malformed_setting_arguments_are_rejected() {
        assert!(parse_setting("target delay").is_err());
        assert!(parse_setting("=5").is_err());
        assert!(
            parse_setting("target delay=soon")
                .is_err_and(|message| message.contains("integer value"))
        );
    }

    #[test]
    fn apply_requires_at_least_one_setting() {
        assert!(parse(&["apply"]).is_err());
        let cli = parse(&["apply", "binlog retention hours=24", "target delay=0"])
            .expect("valid apply invocation");
        match cli.command {
            Command::Apply(args) => assert_eq!(args.settings.len(), 2),
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn duplicate_desired_names_fail_validation() {
        let settings = vec![
            SettingArg {
                name: "target delay".to_string(),
                value: 1,
            },
            SettingArg {
                name: "target delay".to_string(),
                value: 2,
            },
        ];
        let err = desired_from(settings).expect_err("duplicate names");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("target delay"));
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let cli = parse(&[
            "read",
            "--endpoint",
            "db.internal",
            "--port",
            "3307",
            "--output",
            "json",
            "--log-format",
            "json",
        ])
        .expect("valid read invocation");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_format, LogFormat::Json);
        let settings = cli.connection.into_settings();
        assert_eq!(settings.endpoint.as_deref(), Some("db.internal"));
        assert_eq!(settings.port.as_deref(), Some("3307"));
        assert!(settings.username.is_none());
    }

    #[test]
    fn unknown_log_format_is_a_usage_error() {
        assert!(parse(&["show", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn labels_cover_every_command() {
        assert_eq!(command_label(&Command::Show), "show");
        assert_eq!(command_label(&Command::Forget), "forget");
    }
}
