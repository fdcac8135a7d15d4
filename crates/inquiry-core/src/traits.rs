//! Trait abstraction over the platform Bluetooth stack.
//!
//! The discovery loop only needs four operations from the stack. Putting them
//! behind [`BluetoothAdapter`] lets the loop run against the real adapter
//! ([`crate::PlatformAdapter`]) or an in-memory one ([`crate::MockAdapter`]).

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use inquiry_types::{DeviceHandle, DeviceProperties};

use crate::error::Result;

/// Operations the discovery loop consumes from a Bluetooth adapter.
///
/// # Example
///
/// ```ignore
/// use inquiry_core::{BluetoothAdapter, Result};
///
/// async fn count_named<A: BluetoothAdapter>(adapter: &A) -> Result<usize> {
///     let devices = adapter.list_known_devices().await?;
///     Ok(devices.values().filter(|p| p.name.is_some()).count())
/// }
/// ```
#[async_trait]
pub trait BluetoothAdapter: Send + Sync {
    /// Begin device discovery.
    async fn start_discovery(&self) -> Result<()>;

    /// End device discovery.
    async fn stop_discovery(&self) -> Result<()>;

    /// All devices the adapter currently knows, with their properties.
    ///
    /// This includes devices found in earlier cycles that the stack still
    /// caches, not only those seen since the last `start_discovery`.
    async fn list_known_devices(&self) -> Result<HashMap<DeviceHandle, DeviceProperties>>;

    /// Look up the service UUIDs of one device.
    ///
    /// `Ok(None)` means the device exposes no UUID list.
    async fn service_uuids(&self, handle: &DeviceHandle) -> Result<Option<Vec<Uuid>>>;
}
