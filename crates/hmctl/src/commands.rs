//! CLI command implementations

use std::fmt;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use hmclient::{
    notification_for, ClientError, ClientOptions, FileStorage, HubClient, Session, SessionState,
};
use hmconf::{ConfigSources, HmConfig};
use hmproto::request::GetVersionRequest;
use hmproto::{error_set_for, HubRequest, RequestKind};
use owo_colors::OwoColorize;

use crate::output::StderrSink;

fn build_client(config: &HmConfig) -> HubClient {
    let storage = Arc::new(FileStorage::new(config.session.store_path()));
    let session = Arc::new(Session::restore(storage, config.session.storage_key.clone()));
    HubClient::new(
        ClientOptions::from_config(config),
        session,
        Arc::new(StderrSink),
    )
}

/// A failure the user has already seen as a notification.
#[derive(Debug)]
pub struct Reported(pub ClientError);

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Reported {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Show the user-facing message, then hand the error back for the exit code.
/// Errors without a notification come back bare so `main` prints them.
fn report(client: &HubClient, error: ClientError) -> anyhow::Error {
    if notification_for(&error).is_none() {
        return anyhow::Error::new(error);
    }
    client.handle_error(&error);
    anyhow::Error::new(Reported(error))
}

fn default_device() -> String {
    format!("hmctl {} ({})", env!("CARGO_PKG_VERSION"), std::env::consts::OS)
}

pub async fn login(
    config: &HmConfig,
    username: &str,
    password: Option<String>,
    device: Option<String>,
) -> Result<()> {
    let password = match password.or_else(|| std::env::var("HM_PASSWORD").ok()) {
        Some(password) => password,
        None => bail!("No password given: pass --password or set HM_PASSWORD"),
    };
    let device = device.unwrap_or_else(default_device);

    let client = build_client(config);
    client
        .login(username, &password, &device)
        .await
        .map_err(|e| report(&client, e))?;

    println!("{} Logged in as {}", "✓".green(), username.bold());
    Ok(())
}

pub async fn logout(config: &HmConfig) -> Result<()> {
    let client = build_client(config);
    if client.session().state() == SessionState::Unauthenticated {
        println!("Not logged in");
        return Ok(());
    }
    client.logout().await.map_err(|e| report(&client, e))?;
    println!("{} Logged out", "✓".green());
    Ok(())
}

pub async fn status(config: &HmConfig) -> Result<()> {
    let client = build_client(config);

    println!("Hub:     {}", client.endpoint());
    println!("Store:   {}", config.session.store_path().display());
    let state = match client.session().state() {
        SessionState::Authenticated => "authenticated".green().to_string(),
        SessionState::Unauthenticated => "unauthenticated".yellow().to_string(),
    };
    println!("Session: {}", state);

    let version = client
        .call(GetVersionRequest {})
        .await
        .map_err(|e| report(&client, e))?;
    println!("Version: {}", version.version);
    Ok(())
}

/// Send a raw request JSON and print the success payload
pub async fn send(config: &HmConfig, json: &str) -> Result<()> {
    let request: HubRequest =
        serde_json::from_str(json).context("Failed to parse JSON as a hub request")?;

    let client = build_client(config);
    let data = client
        .send_request(&request)
        .await
        .map_err(|e| report(&client, e))?;

    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

/// Print the request catalog
pub fn kinds(only: Option<&str>) -> Result<()> {
    let selected: Vec<RequestKind> = match only {
        Some(name) => match name.parse::<RequestKind>() {
            Ok(kind) => vec![kind],
            Err(e) => bail!("{}", e),
        },
        None => RequestKind::ALL.to_vec(),
    };

    for kind in selected {
        println!("{}", describe_kind(kind));
    }
    Ok(())
}

fn describe_kind(kind: RequestKind) -> String {
    let spec = kind.spec();
    let params = if spec.params.is_empty() {
        "-".to_string()
    } else {
        spec.params.join(", ")
    };
    let response = if spec.response.is_empty() {
        "{}".to_string()
    } else {
        format!("{{{}}}", spec.response.fields.join(", "))
    };
    let errors: Vec<String> = error_set_for(kind).iter().map(|e| e.to_string()).collect();

    format!(
        "{}\n  params:   {}\n  response: {} {}\n  errors:   {}",
        kind.as_str().bold(),
        params,
        spec.response.name,
        response,
        errors.join(", ")
    )
}

pub fn show_config(config: &HmConfig, sources: &ConfigSources) {
    print!("{}", config.to_toml());

    println!();
    if sources.files.is_empty() {
        println!("# No config files found, using defaults");
    }
    for file in &sources.files {
        println!("# loaded: {}", file.display());
    }
    for var in &sources.env_overrides {
        println!("# env:    {}", var);
    }
}
