//! The periodic inquiry loop.
//!
//! Each cycle starts discovery, lists every device the adapter knows, builds
//! and logs one [`DeviceRecord`] per device concurrently, waits for all of
//! them, and stops discovery. The loop then sleeps for the configured
//! interval and repeats until cancelled.
//!
//! ```text
//!        start_discovery
//!   Idle ───────────────▶ Scanning
//!    ▲                       │
//!    └───────────────────────┘
//!     stop_discovery, sleep
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use inquiry_types::{DeviceHandle, DeviceProperties};

use crate::error::{Error, Result};
use crate::record::{DeviceRecord, now_timestamp};
use crate::services::resolve_services;
use crate::traits::BluetoothAdapter;

/// Default pause between discovery cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Whether the loop currently has discovery running on the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Idle,
    Scanning,
}

/// Options for the discovery loop.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Pause between the end of one cycle and the start of the next.
    pub interval: Duration,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl DiscoveryOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pause between cycles.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the pause between cycles in seconds.
    pub fn interval_secs(mut self, secs: u64) -> Self {
        self.interval = Duration::from_secs(secs);
        self
    }

    /// Reject a zero interval, which would spin the adapter.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::invalid_config("discovery interval must be positive"));
        }
        Ok(())
    }
}

/// Outcome of one discovery cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Records logged this cycle, in completion order.
    pub records: Vec<DeviceRecord>,
    /// Devices left out for lacking an address or a name.
    pub skipped: usize,
    /// Device tasks that panicked.
    pub failed: usize,
}

/// Periodic inquiry driver over an injected adapter.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use inquiry_core::{DiscoveryLoop, DiscoveryOptions, PlatformAdapter};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> inquiry_core::Result<()> {
/// let adapter = Arc::new(PlatformAdapter::first().await?);
/// let inquiry = DiscoveryLoop::new(adapter, DiscoveryOptions::default());
///
/// let cancel = CancellationToken::new();
/// let ctrl_c = cancel.clone();
/// tokio::spawn(async move {
///     let _ = tokio::signal::ctrl_c().await;
///     ctrl_c.cancel();
/// });
///
/// inquiry.run(cancel).await
/// # }
/// ```
pub struct DiscoveryLoop<A: BluetoothAdapter + ?Sized + 'static> {
    adapter: Arc<A>,
    options: DiscoveryOptions,
    scanning: AtomicBool,
}

impl<A: BluetoothAdapter + ?Sized + 'static> DiscoveryLoop<A> {
    pub fn new(adapter: Arc<A>, options: DiscoveryOptions) -> Self {
        Self {
            adapter,
            options,
            scanning: AtomicBool::new(false),
        }
    }

    /// The adapter this loop drives.
    pub fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    pub fn state(&self) -> DiscoveryState {
        if self.scanning.load(Ordering::Relaxed) {
            DiscoveryState::Scanning
        } else {
            DiscoveryState::Idle
        }
    }

    /// Run one discovery cycle.
    ///
    /// Every reportable device gets its own task; all tasks are joined
    /// before discovery is stopped. A panicking task is counted in
    /// [`CycleReport::failed`] and does not end the cycle.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        self.adapter.start_discovery().await?;
        self.scanning.store(true, Ordering::Relaxed);
        debug!("Discovery started");

        let devices = match self.adapter.list_known_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                self.stop_quietly().await;
                return Err(e);
            }
        };
        debug!("Adapter knows {} device(s)", devices.len());

        let mut report = CycleReport::default();
        let mut tasks = JoinSet::new();

        for (handle, properties) in devices {
            if !properties.is_reportable() {
                debug!("Skipping {}: missing address or name", handle);
                report.skipped += 1;
                continue;
            }
            let adapter = Arc::clone(&self.adapter);
            tasks.spawn(async move { describe_device(adapter.as_ref(), handle, properties).await });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(record)) => report.records.push(record),
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    warn!("Device task failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        self.adapter.stop_discovery().await?;
        self.scanning.store(false, Ordering::Relaxed);
        debug!(
            "Discovery stopped: {} logged, {} skipped",
            report.records.len(),
            report.skipped
        );

        Ok(report)
    }

    /// Run cycles until `cancel` fires.
    ///
    /// Cancellation abandons any in-flight device tasks. An adapter failure
    /// ends the loop with that error.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        info!(
            "Searching for Bluetooth devices every {}s...",
            self.options.interval.as_secs()
        );

        let result = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break Ok(()),
                cycle = self.run_cycle() => {
                    if let Err(e) = cycle {
                        error!("Discovery cycle failed: {}", e);
                        break Err(e);
                    }
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break Ok(()),
                _ = sleep(self.options.interval) => {}
            }
        };

        if self.state() == DiscoveryState::Scanning {
            self.stop_quietly().await;
        }
        info!("Inquiry stopped");

        result
    }

    async fn stop_quietly(&self) {
        if let Err(e) = self.adapter.stop_discovery().await {
            debug!("Failed to stop discovery: {}", e);
        }
        self.scanning.store(false, Ordering::Relaxed);
    }
}

/// Build, log and return the record for one device.
async fn describe_device<A>(
    adapter: &A,
    handle: DeviceHandle,
    properties: DeviceProperties,
) -> Option<DeviceRecord>
where
    A: BluetoothAdapter + ?Sized,
{
    let timestamp = now_timestamp();
    let services = resolve_services(adapter, &handle).await;
    let record = DeviceRecord::build(handle, &properties, services, timestamp)?;
    record.emit();
    Some(record)
}
