//! vrctools - manage your VRChat avatars from the terminal.
//!
//! Usage: `vrctools avatars [current|delete]`
//!
//! The session cookies are cached in `DATA_FILE` (default `./data.json`), so
//! credentials are only asked for when that session is missing or expired.

mod bootstrap;
mod commands;

use std::io;
use std::process::ExitCode;

use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vrctools_core::avatars::Console;
use vrctools_core::config::Config;

use bootstrap::Stage;
use commands::Command;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn report(err: &anyhow::Error, stage: Stage) -> ExitCode {
    ExitCode::from(bootstrap::write_failure(&mut io::stderr(), err, stage))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("vrctools starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args);

    let config = Config::load();
    debug!(data_file = %config.data_file.display(), api = %config.api_base_url, "Configuration loaded");

    let mut client = match bootstrap::connect(&config) {
        Ok(client) => client,
        Err(e) => return report(&e, Stage::Authentication),
    };

    let session = match bootstrap::sign_in(&mut client).await {
        Ok(session) => session,
        Err(e) => return report(&e, Stage::Authentication),
    };
    println!("Logged in as {}.", session.display_name());

    let mut console = Console::stdio();
    if let Err(e) = commands::dispatch(command, &client, &session, &mut console).await {
        return report(&e, Stage::Command);
    }

    ExitCode::SUCCESS
}
