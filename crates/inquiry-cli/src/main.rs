use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use inquiry_cli::config::Config;
use inquiry_cli::logging::{Verbosity, init_logging};
use inquiry_core::{DiscoveryLoop, DiscoveryOptions, PlatformAdapter};

#[derive(Parser, Debug)]
#[command(name = "bt-inquiry")]
#[command(author, version, about = "Log nearby Bluetooth devices and their Class of Device", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seconds between discovery cycles (overrides config)
    #[arg(short, long, global = true)]
    interval: Option<u64>,

    /// Bluetooth adapter to use, e.g. hci0 (overrides config)
    #[arg(short, long, global = true)]
    adapter: Option<String>,

    /// Directory for log files (overrides config)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the inquiry loop until interrupted (default)
    Run,

    /// Decode a hexadecimal Class of Device value
    Decode {
        /// Class of Device, e.g. 0x240418
        class: String,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Decode { ref class, pretty }) => decode(class, pretty),
        Some(Command::Run) | None => run(cli).await,
    }
}

fn decode(class: &str, pretty: bool) -> Result<()> {
    let json = if pretty {
        inquiry_types::describe_hex_pretty(class)
    } else {
        inquiry_types::describe_hex(class)
    }
    .with_context(|| format!("Cannot decode Class of Device '{}'", class))?;
    println!("{}", json);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    // Override config with CLI args
    if let Some(interval) = cli.interval {
        config.discovery.interval_secs = interval;
    }
    if let Some(adapter) = cli.adapter {
        config.discovery.adapter = Some(adapter);
    }
    if let Some(dir) = cli.log_dir {
        config.logging.directory = dir;
    }
    config.validate()?;

    let _guard = init_logging(
        &config.logging,
        Verbosity::from_flags(cli.verbose, cli.quiet),
    )?;

    let adapter = PlatformAdapter::open(config.discovery.adapter.as_deref())
        .await
        .context("Failed to open Bluetooth adapter")?;

    let options = DiscoveryOptions::new().interval(config.discovery.interval());
    options.validate()?;
    let inquiry = DiscoveryLoop::new(Arc::new(adapter), options);

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    inquiry.run(cancel).await?;
    Ok(())
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, stopping");
                cancel.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}
