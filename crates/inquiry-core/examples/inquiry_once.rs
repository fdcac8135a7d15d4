//! Run a single inquiry cycle and print every device found
//!
//! Usage: inquiry_once [ADAPTER] [SCAN_SECONDS]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use inquiry_core::{BluetoothAdapter, DiscoveryLoop, DiscoveryOptions, PlatformAdapter};
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inquiry_core=debug".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let adapter_name = args.get(1).map(String::as_str);
    let scan_secs: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(5);

    let adapter = Arc::new(PlatformAdapter::open(adapter_name).await?);

    // Give the stack time to collect devices before the cycle lists them
    println!("Warming up discovery for {}s...", scan_secs);
    adapter.start_discovery().await?;
    sleep(Duration::from_secs(scan_secs)).await;
    adapter.stop_discovery().await?;

    let inquiry = DiscoveryLoop::new(adapter, DiscoveryOptions::default());
    let report = inquiry.run_cycle().await?;

    println!(
        "\n{} device(s) logged, {} skipped\n",
        report.records.len(),
        report.skipped
    );
    for record in &report.records {
        println!("{}\n", record);
    }

    Ok(())
}
