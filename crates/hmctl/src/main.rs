//! hmctl - command-line client for the Home Modules hub
//!
//! Subcommands:
//! - `hmctl login <username>` - Log in and persist the session token
//! - `hmctl logout` - End the current session
//! - `hmctl status` - Show the session state and hub version
//! - `hmctl send <json>` - Send a raw request and print the payload
//! - `hmctl kinds` - List every request kind with its parameters and errors
//! - `hmctl config` - Print the merged configuration

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "hmctl")]
#[command(about = "Command-line client for the Home Modules hub")]
#[command(version)]
struct Cli {
    /// Config file, used in place of ./hm.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hub base URL, overrides the configured one
    #[arg(long, global = true)]
    hub: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        username: String,

        /// Password (falls back to HM_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,

        /// Device description shown in the hub's session list
        #[arg(short, long)]
        device: Option<String>,
    },

    /// Log out of the current session
    Logout,

    /// Show session state and hub version
    Status,

    /// Send a raw request, e.g. '{"type": "rooms.getRooms"}'
    Send {
        /// Request JSON including its `type`
        json: String,
    },

    /// List the request catalog
    Kinds {
        /// Only show this request type
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Print the merged configuration and where it came from
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match failure_line(&e) {
                Some(line) => eprintln!("{}", line),
                None => tracing::debug!(error = %e, "Command failed"),
            }
            ExitCode::FAILURE
        }
    }
}

/// The line to print for a failed command. Nothing for errors the
/// notification sink already showed.
fn failure_line(error: &anyhow::Error) -> Option<String> {
    if error.is::<commands::Reported>() {
        return None;
    }
    Some(format!("{} {:#}", "error:".red().bold(), error))
}

async fn run(cli: Cli) -> Result<()> {
    let (mut config, sources) = hmconf::HmConfig::load_with_sources_from(cli.config.as_deref())?;
    if let Some(hub) = cli.hub {
        config.hub.url = hub;
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.telemetry.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::debug!(files = ?sources.files, env = ?sources.env_overrides, "Config loaded");

    match cli.command {
        Commands::Login {
            username,
            password,
            device,
        } => {
            commands::login(&config, &username, password, device).await?;
        }
        Commands::Logout => {
            commands::logout(&config).await?;
        }
        Commands::Status => {
            commands::status(&config).await?;
        }
        Commands::Send { json } => {
            commands::send(&config, &json).await?;
        }
        Commands::Kinds { kind } => {
            commands::kinds(kind.as_deref())?;
        }
        Commands::Config => {
            commands::show_config(&config, &sources);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn reported_errors_print_once() {
        let reported = anyhow::Error::new(commands::Reported(hmclient::ClientError::Protocol(
            "bad envelope".into(),
        )));
        assert_eq!(failure_line(&reported), None);

        let plain = anyhow::anyhow!("No password given");
        assert!(failure_line(&plain).unwrap().contains("No password given"));
    }

    #[test]
    fn parse_login() {
        let cli = Cli::parse_from(["hmctl", "--hub", "http://hub:8080", "login", "admin", "-p", "pw"]);
        assert_eq!(cli.hub.as_deref(), Some("http://hub:8080"));
        match cli.command {
            Commands::Login {
                username, password, device,
            } => {
                assert_eq!(username, "admin");
                assert_eq!(password.as_deref(), Some("pw"));
                assert_eq!(device, None);
            }
            _ => panic!("expected login"),
        }
    }
}
