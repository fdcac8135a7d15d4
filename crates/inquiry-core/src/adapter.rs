//! Bluetooth adapter backed by the platform stack (BlueZ, CoreBluetooth, WinRT).
//!
//! [`PlatformAdapter`] implements [`BluetoothAdapter`] on top of btleplug.
//! On Linux btleplug talks to BlueZ over D-Bus, so discovery here is the
//! same `StartDiscovery`/`StopDiscovery` pair and device listing walks the
//! same object tree BlueZ exposes.

use std::collections::HashMap;

use async_trait::async_trait;
use btleplug::api::{Central, Manager as _, Peripheral as _, PeripheralProperties, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use futures::future::join_all;
use tracing::{debug, info};
use uuid::Uuid;

use inquiry_types::{DeviceHandle, DeviceProperties};

use crate::error::{Error, Result};
use crate::traits::BluetoothAdapter;
use crate::util::{device_address, format_peripheral_id};

/// A platform Bluetooth adapter.
pub struct PlatformAdapter {
    adapter: Adapter,
    info: String,
}

impl std::fmt::Debug for PlatformAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformAdapter")
            .field("info", &self.info)
            .finish()
    }
}

impl PlatformAdapter {
    /// Open the first available adapter.
    pub async fn first() -> Result<Self> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NoAdapter)?;
        Self::with_info(adapter).await
    }

    /// Open the adapter whose description contains `name` (e.g. `hci0`).
    pub async fn named(name: &str) -> Result<Self> {
        let manager = Manager::new().await?;
        let needle = name.to_lowercase();

        for adapter in manager.adapters().await? {
            let info = adapter.adapter_info().await?;
            if info.to_lowercase().contains(&needle) {
                return Ok(Self { adapter, info });
            }
        }

        Err(Error::AdapterNotFound(name.to_string()))
    }

    /// Open a named adapter if `name` is given, otherwise the first one.
    pub async fn open(name: Option<&str>) -> Result<Self> {
        let adapter = match name {
            Some(name) => Self::named(name).await?,
            None => Self::first().await?,
        };
        info!("Using Bluetooth adapter: {}", adapter.info);
        Ok(adapter)
    }

    /// Wrap an adapter obtained elsewhere.
    pub async fn with_info(adapter: Adapter) -> Result<Self> {
        let info = adapter.adapter_info().await?;
        Ok(Self { adapter, info })
    }

    /// The platform's description of this adapter.
    pub fn info(&self) -> &str {
        &self.info
    }

    async fn find_peripheral(&self, handle: &DeviceHandle) -> Result<Option<Peripheral>> {
        let peripherals = self.adapter.peripherals().await?;
        Ok(peripherals
            .into_iter()
            .find(|p| format_peripheral_id(&p.id()) == handle.as_str()))
    }
}

#[async_trait]
impl BluetoothAdapter for PlatformAdapter {
    async fn start_discovery(&self) -> Result<()> {
        self.adapter.start_scan(ScanFilter::default()).await?;
        Ok(())
    }

    async fn stop_discovery(&self) -> Result<()> {
        self.adapter.stop_scan().await?;
        Ok(())
    }

    async fn list_known_devices(&self) -> Result<HashMap<DeviceHandle, DeviceProperties>> {
        let peripherals = self.adapter.peripherals().await?;
        let results = join_all(
            peripherals
                .iter()
                .map(|p| async move { (p.id(), p.properties().await) }),
        )
        .await;

        let mut devices = HashMap::with_capacity(results.len());
        for (id, properties) in results {
            match properties {
                Ok(Some(properties)) => {
                    let handle = DeviceHandle::new(format_peripheral_id(&id));
                    devices.insert(handle, to_device_properties(&id, properties));
                }
                Ok(None) => {}
                Err(e) => {
                    debug!("Error reading properties of {}: {}", format_peripheral_id(&id), e);
                }
            }
        }

        Ok(devices)
    }

    async fn service_uuids(&self, handle: &DeviceHandle) -> Result<Option<Vec<Uuid>>> {
        let peripheral = self
            .find_peripheral(handle)
            .await
            .map_err(|e| Error::service_lookup(handle, e.to_string()))?
            .ok_or_else(|| Error::DeviceNotFound(handle.to_string()))?;

        let properties = peripheral
            .properties()
            .await
            .map_err(|e| Error::service_lookup(handle, e.to_string()))?;

        Ok(properties.map(|p| p.services))
    }
}

/// Convert btleplug's property set into the adapter-neutral one.
fn to_device_properties(id: &PeripheralId, properties: PeripheralProperties) -> DeviceProperties {
    let uuids = (!properties.services.is_empty()).then_some(properties.services);

    DeviceProperties {
        address: Some(device_address(&properties.address.to_string(), id)),
        name: properties.local_name,
        class: properties.class,
        rssi: properties.rssi,
        uuids,
    }
}
