//! Device and service types shared between adapters and the discovery loop.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder service name; names are not resolved from UUIDs.
pub const UNKNOWN_SERVICE: &str = "Unknown Service";

/// Placeholder profile name; profiles are not resolved from UUIDs.
pub const UNKNOWN_PROFILE: &str = "Unknown Profile";

/// Opaque identifier of a device known to a Bluetooth adapter.
///
/// On BlueZ this is the peripheral's object path or address, on macOS the
/// CoreBluetooth UUID. It is only meaningful to the adapter that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DeviceHandle(String);

impl DeviceHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceHandle {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Properties an adapter reports for a known device.
///
/// Every field is optional; devices without an address or a name are not
/// reported by the discovery loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceProperties {
    /// Bluetooth address (e.g. `AA:BB:CC:DD:EE:FF`).
    pub address: Option<String>,
    /// Remote name.
    pub name: Option<String>,
    /// Raw Class of Device value.
    pub class: Option<u32>,
    /// Signal strength in dBm.
    pub rssi: Option<i16>,
    /// Advertised service UUIDs, if the adapter reported any.
    pub uuids: Option<Vec<Uuid>>,
}

impl DeviceProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: u32) -> Self {
        self.class = Some(class);
        self
    }

    #[must_use]
    pub fn with_rssi(mut self, rssi: i16) -> Self {
        self.rssi = Some(rssi);
        self
    }

    #[must_use]
    pub fn with_uuids(mut self, uuids: Vec<Uuid>) -> Self {
        self.uuids = Some(uuids);
        self
    }

    /// Returns `true` if both address and name are present.
    #[must_use]
    pub fn is_reportable(&self) -> bool {
        self.address.is_some() && self.name.is_some()
    }
}

/// A service advertised by a device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServiceDescriptor {
    pub uuid: Uuid,
    pub name: String,
    pub profile: String,
}

impl ServiceDescriptor {
    /// Describe a service UUID. Name and profile are placeholders.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            name: UNKNOWN_SERVICE.to_string(),
            profile: UNKNOWN_PROFILE.to_string(),
        }
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({})", self.name, self.uuid, self.profile)
    }
}

/// The services resolved for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", content = "services", rename_all = "snake_case"))]
pub enum DeviceServices {
    /// At least one service UUID was reported.
    Found(Vec<ServiceDescriptor>),
    /// The "No services found" placeholder: the list was absent, empty, or
    /// could not be retrieved.
    NoneFound,
}

impl DeviceServices {
    /// Build from an optional UUID list; `None` and empty lists both yield
    /// [`DeviceServices::NoneFound`].
    #[must_use]
    pub fn from_uuids(uuids: Option<Vec<Uuid>>) -> Self {
        match uuids {
            Some(uuids) if !uuids.is_empty() => {
                Self::Found(uuids.into_iter().map(ServiceDescriptor::from_uuid).collect())
            }
            _ => Self::NoneFound,
        }
    }

    #[must_use]
    pub fn is_none_found(&self) -> bool {
        matches!(self, Self::NoneFound)
    }

    /// The resolved descriptors; empty for the placeholder.
    #[must_use]
    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        match self {
            Self::Found(services) => services,
            Self::NoneFound => &[],
        }
    }
}

impl fmt::Display for DeviceServices {
    /// Renders `-` for the placeholder, otherwise `; `-separated descriptors.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoneFound => f.write_str("-"),
            Self::Found(services) => {
                for (i, service) in services.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{service}")?;
                }
                Ok(())
            }
        }
    }
}
