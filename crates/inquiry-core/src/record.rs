//! Per-device inquiry records and their log output.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;
use tracing::info;

use inquiry_types::{
    ClassOfDevice, DecodedDeviceClass, DeviceClassRecord, DeviceHandle, DeviceProperties,
    DeviceServices,
};

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(datetime: OffsetDateTime) -> String {
    datetime
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| datetime.to_string())
}

/// The current local time, formatted for a record.
///
/// Falls back to UTC when the local offset cannot be determined, which is
/// common in multi-threaded processes on Unix.
pub fn now_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_timestamp(now)
}

/// Everything logged about one device in one discovery cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// When the record was built (`YYYY-MM-DD HH:MM:SS`).
    pub timestamp: String,
    /// The adapter's handle for the device.
    pub handle: DeviceHandle,
    /// MAC address (or platform identifier where addresses are hidden).
    pub address: String,
    pub name: String,
    /// Raw Class of Device; `0x000000` when the device reported none.
    pub class: ClassOfDevice,
    /// The decoded class as flat strings.
    #[serde(flatten)]
    pub class_info: DeviceClassRecord,
    /// Signal strength in dBm, when reported.
    pub rssi: Option<i16>,
    pub services: DeviceServices,
}

impl DeviceRecord {
    /// Build a record, or `None` if the device lacks an address or a name.
    pub fn build(
        handle: DeviceHandle,
        properties: &DeviceProperties,
        services: DeviceServices,
        timestamp: String,
    ) -> Option<Self> {
        let address = properties.address.clone()?;
        let name = properties.name.clone()?;
        let class = ClassOfDevice::new(properties.class.unwrap_or(0));

        Some(Self {
            timestamp,
            handle,
            address,
            name,
            class,
            class_info: class.decode().to_record(),
            rssi: properties.rssi,
            services,
        })
    }

    /// Decode the class again into its typed form.
    pub fn decoded(&self) -> DecodedDeviceClass {
        self.class.decode()
    }

    /// Log this record as a single structured INFO event.
    pub fn emit(&self) {
        info!(
            target: "inquiry::device",
            timestamp = %self.timestamp,
            mac = %self.address,
            name = %self.name,
            class = %self.class,
            major_service_class = %self.class_info.major_service_class,
            major_device_class = %self.class_info.major_device_class,
            minor_device_class = %self.class_info.minor_device_class,
            rssi = self.rssi,
            services = %self.services,
            "Device found"
        );
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timestamp: {}", self.timestamp)?;
        writeln!(f, "MAC: {}", self.address)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Class: {}", self.class)?;
        writeln!(f, "Major Service Class: {}", self.class_info.major_service_class)?;
        writeln!(f, "Major Device Class: {}", self.class_info.major_device_class)?;
        writeln!(f, "Minor Device Class: {}", self.class_info.minor_device_class)?;
        if let Some(rssi) = self.rssi {
            writeln!(f, "RSSI: {} dBm", rssi)?;
        }
        match &self.services {
            DeviceServices::NoneFound => write!(f, "Services: -"),
            DeviceServices::Found(services) => {
                write!(f, "Services:")?;
                for service in services {
                    write!(
                        f,
                        "\n  {} (UUID: {}, Profile: {})",
                        service.name, service.uuid, service.profile
                    )?;
                }
                Ok(())
            }
        }
    }
}
