//! Mock adapter implementation for testing.
//!
//! [`MockAdapter`] implements [`BluetoothAdapter`] over an in-memory device
//! table, so the discovery loop can be exercised without Bluetooth hardware.
//!
//! # Features
//!
//! - **Device table**: add, replace and remove devices between cycles
//! - **Call counters**: observe how often discovery was started and stopped
//! - **Failure injection**: fail discovery start, or the service lookup of
//!   individual devices
//! - **Latency simulation**: delay service lookups to simulate a slow stack

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inquiry_types::{DeviceHandle, DeviceProperties};

use crate::error::{Error, Result};
use crate::traits::BluetoothAdapter;

/// A mock Bluetooth adapter for testing.
///
/// # Example
///
/// ```
/// use inquiry_core::{BluetoothAdapter, MockAdapter};
/// use inquiry_types::DeviceProperties;
///
/// #[tokio::main]
/// async fn main() {
///     let adapter = MockAdapter::builder()
///         .device(
///             "dev_1",
///             DeviceProperties::new()
///                 .with_address("AA:BB:CC:DD:EE:FF")
///                 .with_name("Headset")
///                 .with_class(0x240418),
///         )
///         .build();
///
///     adapter.start_discovery().await.unwrap();
///     let devices = adapter.list_known_devices().await.unwrap();
///     assert_eq!(devices.len(), 1);
///     assert!(adapter.is_discovering());
/// }
/// ```
pub struct MockAdapter {
    devices: RwLock<HashMap<DeviceHandle, DeviceProperties>>,
    failing_lookups: HashSet<DeviceHandle>,
    discovering: AtomicBool,
    start_count: AtomicU32,
    stop_count: AtomicU32,
    lookup_count: AtomicU32,
    fail_start: AtomicBool,
    /// Simulated service lookup latency in milliseconds (0 = no delay).
    lookup_latency_ms: AtomicU64,
}

impl std::fmt::Debug for MockAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAdapter")
            .field("discovering", &self.discovering.load(Ordering::Relaxed))
            .field("start_count", &self.start_count.load(Ordering::Relaxed))
            .field("stop_count", &self.stop_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdapter {
    /// Create an adapter that knows no devices.
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
            failing_lookups: HashSet::new(),
            discovering: AtomicBool::new(false),
            start_count: AtomicU32::new(0),
            stop_count: AtomicU32::new(0),
            lookup_count: AtomicU32::new(0),
            fail_start: AtomicBool::new(false),
            lookup_latency_ms: AtomicU64::new(0),
        }
    }

    /// Start building a mock adapter.
    #[must_use]
    pub fn builder() -> MockAdapterBuilder {
        MockAdapterBuilder::new()
    }

    /// Add or replace a device.
    pub async fn insert_device(&self, handle: impl Into<DeviceHandle>, properties: DeviceProperties) {
        self.devices.write().await.insert(handle.into(), properties);
    }

    /// Forget a device.
    pub async fn remove_device(&self, handle: &DeviceHandle) -> Option<DeviceProperties> {
        self.devices.write().await.remove(handle)
    }

    /// Make `start_discovery` fail.
    pub fn set_fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::Relaxed);
    }

    /// Set simulated service lookup latency.
    pub fn set_lookup_latency(&self, latency: Duration) {
        self.lookup_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Whether discovery is currently running.
    pub fn is_discovering(&self) -> bool {
        self.discovering.load(Ordering::Relaxed)
    }

    /// Number of successful `start_discovery` calls.
    pub fn start_count(&self) -> u32 {
        self.start_count.load(Ordering::Relaxed)
    }

    /// Number of `stop_discovery` calls.
    pub fn stop_count(&self) -> u32 {
        self.stop_count.load(Ordering::Relaxed)
    }

    /// Number of service lookups, failed ones included.
    pub fn lookup_count(&self) -> u32 {
        self.lookup_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BluetoothAdapter for MockAdapter {
    async fn start_discovery(&self) -> Result<()> {
        if self.fail_start.load(Ordering::Relaxed) {
            return Err(Error::NoAdapter);
        }
        self.start_count.fetch_add(1, Ordering::Relaxed);
        self.discovering.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn stop_discovery(&self) -> Result<()> {
        self.stop_count.fetch_add(1, Ordering::Relaxed);
        self.discovering.store(false, Ordering::Relaxed);
        Ok(())
    }

    async fn list_known_devices(&self) -> Result<HashMap<DeviceHandle, DeviceProperties>> {
        Ok(self.devices.read().await.clone())
    }

    async fn service_uuids(&self, handle: &DeviceHandle) -> Result<Option<Vec<Uuid>>> {
        self.lookup_count.fetch_add(1, Ordering::Relaxed);

        let latency = self.lookup_latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.failing_lookups.contains(handle) {
            return Err(Error::service_lookup(handle, "mock lookup failure"));
        }

        self.devices
            .read()
            .await
            .get(handle)
            .map(|props| props.uuids.clone())
            .ok_or_else(|| Error::DeviceNotFound(handle.to_string()))
    }
}

/// Builder for creating mock adapters with preset devices.
#[derive(Debug, Default)]
pub struct MockAdapterBuilder {
    devices: HashMap<DeviceHandle, DeviceProperties>,
    failing_lookups: HashSet<DeviceHandle>,
    fail_start: bool,
    lookup_latency: Duration,
}

impl MockAdapterBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device.
    #[must_use]
    pub fn device(mut self, handle: impl Into<DeviceHandle>, properties: DeviceProperties) -> Self {
        self.devices.insert(handle.into(), properties);
        self
    }

    /// Make the service lookup of `handle` fail.
    #[must_use]
    pub fn failing_lookup(mut self, handle: impl Into<DeviceHandle>) -> Self {
        self.failing_lookups.insert(handle.into());
        self
    }

    /// Make `start_discovery` fail.
    #[must_use]
    pub fn fail_start(mut self, fail: bool) -> Self {
        self.fail_start = fail;
        self
    }

    /// Delay every service lookup.
    #[must_use]
    pub fn lookup_latency(mut self, latency: Duration) -> Self {
        self.lookup_latency = latency;
        self
    }

    /// Build the mock adapter.
    #[must_use]
    pub fn build(self) -> MockAdapter {
        MockAdapter {
            devices: RwLock::new(self.devices),
            failing_lookups: self.failing_lookups,
            discovering: AtomicBool::new(false),
            start_count: AtomicU32::new(0),
            stop_count: AtomicU32::new(0),
            lookup_count: AtomicU32::new(0),
            fail_start: AtomicBool::new(self.fail_start),
            lookup_latency_ms: AtomicU64::new(self.lookup_latency.as_millis() as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headset() -> DeviceProperties {
        DeviceProperties::new()
            .with_address("AA:BB:CC:DD:EE:FF")
            .with_name("Headset")
            .with_class(0x240418)
    }

    #[tokio::test]
    async fn test_mock_discovery_counters() {
        let adapter = MockAdapter::new();
        assert!(!adapter.is_discovering());

        adapter.start_discovery().await.unwrap();
        assert!(adapter.is_discovering());
        assert_eq!(adapter.start_count(), 1);

        adapter.stop_discovery().await.unwrap();
        assert!(!adapter.is_discovering());
        assert_eq!(adapter.stop_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_fail_start() {
        let adapter = MockAdapter::builder().fail_start(true).build();
        assert!(adapter.start_discovery().await.is_err());
        assert_eq!(adapter.start_count(), 0);
        assert!(!adapter.is_discovering());

        adapter.set_fail_start(false);
        assert!(adapter.start_discovery().await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_device_table() {
        let adapter = MockAdapter::builder().device("dev_1", headset()).build();
        assert_eq!(adapter.list_known_devices().await.unwrap().len(), 1);

        adapter
            .insert_device("dev_2", DeviceProperties::new().with_name("Other"))
            .await;
        assert_eq!(adapter.list_known_devices().await.unwrap().len(), 2);

        let removed = adapter.remove_device(&DeviceHandle::from("dev_1")).await;
        assert_eq!(removed, Some(headset()));
        assert_eq!(adapter.list_known_devices().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_service_uuids() {
        let uuid = Uuid::from_u128(0x0000110b_0000_1000_8000_00805f9b34fb);
        let adapter = MockAdapter::builder()
            .device("with", headset().with_uuids(vec![uuid]))
            .device("without", headset())
            .build();

        let found = adapter.service_uuids(&"with".into()).await.unwrap();
        assert_eq!(found, Some(vec![uuid]));

        let none = adapter.service_uuids(&"without".into()).await.unwrap();
        assert_eq!(none, None);

        let missing = adapter.service_uuids(&"missing".into()).await;
        assert!(matches!(missing, Err(Error::DeviceNotFound(_))));
        assert_eq!(adapter.lookup_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_failing_lookup() {
        let adapter = MockAdapter::builder()
            .device("dev_1", headset())
            .failing_lookup("dev_1")
            .build();

        let result = adapter.service_uuids(&"dev_1".into()).await;
        assert!(matches!(result, Err(Error::ServiceLookup { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_lookup_latency() {
        let adapter = MockAdapter::builder()
            .device("dev_1", headset())
            .lookup_latency(Duration::from_millis(250))
            .build();

        let start = tokio::time::Instant::now();
        adapter.service_uuids(&"dev_1".into()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
