//! Service list resolution for discovered devices.

use tracing::info;

use inquiry_types::{DeviceHandle, DeviceServices};

use crate::traits::BluetoothAdapter;

/// Resolve the services a device advertises.
///
/// Never fails. An absent or empty UUID list, and any lookup failure, yield
/// the [`DeviceServices::NoneFound`] placeholder. Failures are logged at
/// INFO level and are not distinguished by kind.
pub async fn resolve_services<A>(adapter: &A, handle: &DeviceHandle) -> DeviceServices
where
    A: BluetoothAdapter + ?Sized,
{
    match adapter.service_uuids(handle).await {
        Ok(uuids) => DeviceServices::from_uuids(uuids),
        Err(e) => {
            info!("Could not get services for {}: {}", handle, e);
            DeviceServices::NoneFound
        }
    }
}
