//! ELLP CLI - volunteer and workshop management

mod commands;
mod config;
mod dirs;
mod display;
mod logging;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use commands::{App, Commands};
use ellp_http::{ApiClient, ClientError, FileTokenStore};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "ellp")]
#[command(about = "Manage ELLP volunteers, workshops and participation documents")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Log output format on stderr
    #[arg(long, global = true, value_enum, default_value_t)]
    log_format: logging::LogFormat,

    /// Also write logs to cli.log in the data directory
    #[arg(long, global = true)]
    file_log: bool,

    /// Data directory for the session and logs
    #[arg(short = 'd', long, global = true, env = "ELLP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file (defaults to config.toml in the config directory)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Session file (defaults to session.json in the data directory)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Command failed: {err:#}");
            eprintln!("Error: {}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let dirs = dirs::AppDirs::new(cli.data_dir);
    let log_file = cli.file_log.then(|| dirs.log_file());
    logging::init_logging(cli.log_level.into(), cli.log_format, log_file)?;

    let config_file = cli.config.unwrap_or_else(|| dirs.config_file());
    let config = config::CliConfig::load(Some(&config_file))?;
    debug!(?config, "configuration loaded");

    let session_file = cli.session_file.unwrap_or_else(|| dirs.session_file());
    let store = FileTokenStore::open(&session_file)
        .with_context(|| format!("could not open session file {}", session_file.display()))?;

    let mut builder = ApiClient::builder()
        .base_url(config.api.base_url.clone())
        .token_store(Arc::new(store))
        .on_session_expired(|| debug!("session expired, stored tokens cleared"));
    if let Some(timeout) = config.api.timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(agent) = &config.api.user_agent {
        builder = builder.user_agent(agent.clone());
    }
    let client = builder.build()?;

    let had_session = client.session().refresh_token().is_some();
    let app = App {
        client,
        config,
        json: cli.json,
    };
    cli.command
        .execute(&app)
        .await
        .map_err(|err| login_hint(err, had_session))
}

const NOT_LOGGED_IN: &str = "You are not logged in. Run `ellp login` first.";

/// A lost session is only "expired" if one was stored when the command started
fn login_hint(err: anyhow::Error, had_session: bool) -> anyhow::Error {
    let lost = err
        .downcast_ref::<ClientError>()
        .is_some_and(ClientError::is_session_lost);
    if lost && !had_session {
        anyhow!(NOT_LOGGED_IN)
    } else {
        err
    }
}

/// User-facing text for a failed command
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ClientError>() {
        Some(client_error) => client_error.user_message(),
        None => format!("{err:#}"),
    }
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_client_errors_use_user_message() {
        let err = anyhow::Error::new(ClientError::Conflict("Email já cadastrado".into()));
        assert_eq!(describe(&err), "Email já cadastrado");

        let err = anyhow::anyhow!("nothing to update");
        assert_eq!(describe(&err), "nothing to update");
    }

    #[test]
    fn test_lost_session_without_login_asks_to_log_in() {
        let err = login_hint(anyhow::Error::new(ClientError::NoRefreshToken), false);
        assert_eq!(describe(&err), NOT_LOGGED_IN);

        let err = login_hint(anyhow::Error::new(ClientError::NoRefreshToken), true);
        assert_eq!(describe(&err), ClientError::NoRefreshToken.user_message());

        let err = login_hint(anyhow::Error::new(ClientError::NotFound("missing".into())), false);
        assert_eq!(describe(&err), "missing");
    }

    #[test]
    fn test_parses_nested_commands() {
        let cli = Cli::try_parse_from([
            "ellp",
            "--json",
            "volunteers",
            "create",
            "Ana Souza",
            "ana@ellp.org",
            "--academic",
            "--course",
            "Engenharia",
            "--ra",
            "a123",
            "--entry-date",
            "2024-03-01",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Volunteers(commands::VolunteerCommands::Create { academic: true, .. })
        ));
    }
}
