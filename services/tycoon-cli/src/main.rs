mod console;
mod input;

use console::{ConsoleDisplay, StdoutBridge};
use input::{HELP, Intent};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tycoon_core::{ClientConfig, DisplaySink, Session, TycoonClient};
use tycoon_transport::HostBridge;

/// Host init data JSON, e.g. `{"user": {"id": 42, "username": "alice"}}`.
const ENV_INIT_DATA: &str = "TYCOON_INIT_DATA";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    let identity = tycoon_identity::resolve_str(&std::env::var(ENV_INIT_DATA).unwrap_or_default());
    info!(
        user_id = ?identity.user_id,
        username = %identity.username,
        transport = %config.transport,
        api_base = %config.api_base,
        "session resolved"
    );

    let display = Arc::new(ConsoleDisplay::stdout());
    let host: Arc<dyn HostBridge> = Arc::new(StdoutBridge);
    let client = TycoonClient::connect(Session::new(identity, config), Some(host), display.clone())?;

    client.refresh().await;
    display.show_output(HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        match input::parse_line(&line) {
            Intent::Empty => {}
            Intent::Help => display.show_output(HELP),
            Intent::Refresh => {
                client.refresh().await;
            }
            Intent::Quit => break,
            Intent::Command(text) => {
                client.command(&text).await;
            }
            Intent::Action { action, fields } => {
                let fields: Vec<(&str, &str)> = fields
                    .iter()
                    .map(|(name, value)| (*name, value.as_str()))
                    .collect();
                client.dispatch_form(action, &fields).await;
            }
            Intent::Unknown(verb) => {
                warn!(%verb, "unknown verb");
                display.show_output(&format!("Unknown action: {verb}"));
            }
        }
    }

    Ok(())
}
