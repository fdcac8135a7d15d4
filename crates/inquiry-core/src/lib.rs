//! Core library for periodic Bluetooth device inquiry.
//!
//! This crate drives a Bluetooth adapter through repeated discovery cycles
//! and logs one record per device found: address, name, decoded Class of
//! Device, signal strength and advertised services.
//!
//! # Features
//!
//! - **Discovery loop**: start, list, describe, stop, sleep, repeat
//! - **Concurrent device handling**: one task per device, joined every cycle
//! - **Class of Device decoding**: service classes, major and minor class
//! - **Adapter abstraction**: run against the platform stack or a mock
//! - **Cancellation**: stop cleanly on Ctrl-C or any other trigger
//!
//! # Platform Differences
//!
//! - **Linux**: btleplug talks to BlueZ over D-Bus. Devices are identified by
//!   their MAC address, and the Class of Device is reported for BR/EDR
//!   devices.
//! - **macOS**: CoreBluetooth hides MAC addresses. Records carry the
//!   platform's device UUID in the address field instead.
//! - **Windows**: Devices are identified by MAC address. The Class of Device
//!   is usually not reported and decodes as `0x000000`.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use inquiry_core::{DiscoveryLoop, DiscoveryOptions, PlatformAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = Arc::new(PlatformAdapter::first().await?);
//!     let inquiry = DiscoveryLoop::new(adapter, DiscoveryOptions::default());
//!
//!     let report = inquiry.run_cycle().await?;
//!     for record in &report.records {
//!         println!("{record}\n");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod discovery;
pub mod error;
pub mod mock;
pub mod record;
pub mod services;
pub mod traits;
pub mod util;

pub use adapter::PlatformAdapter;
pub use discovery::{
    CycleReport, DEFAULT_INTERVAL, DiscoveryLoop, DiscoveryOptions, DiscoveryState,
};
pub use error::{Error, Result};
pub use mock::{MockAdapter, MockAdapterBuilder};
pub use record::{DeviceRecord, format_timestamp, now_timestamp};
pub use services::resolve_services;
pub use traits::BluetoothAdapter;

// Re-export the platform-agnostic types so users need only one crate.
pub use inquiry_types::{
    ClassOfDevice, DecodedDeviceClass, DeviceClassRecord, DeviceHandle, DeviceProperties,
    DeviceServices, MajorDeviceClass, MinorDeviceClass, ParseError, ServiceClass,
    ServiceClassSet, ServiceDescriptor, decode, format_hex, parse_and_decode, parse_hex,
};

// Re-export btleplug types that appear in the public API.
pub use btleplug::platform::{Adapter, PeripheralId};

/// Re-export tokio-util's cancellation token used by [`DiscoveryLoop::run`].
pub use tokio_util::sync::CancellationToken;
