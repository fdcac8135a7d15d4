//! Platform-agnostic types for Bluetooth device inquiry.
//!
//! This crate holds the pieces of `bt-inquiry` that need no Bluetooth stack:
//!
//! - Class of Device decoding ([`class`])
//! - Device property and service descriptor types ([`types`])
//! - Error types for hex text parsing ([`error`])
//!
//! # Example
//!
//! ```
//! use inquiry_types::class::parse_and_decode;
//!
//! let decoded = parse_and_decode("0x000104").unwrap();
//! assert_eq!(decoded.major.name(), "Computer");
//! assert_eq!(decoded.minor.as_str(), "Desktop Workstation");
//! ```

pub mod class;
pub mod error;
pub mod types;

pub use class::{
    ClassOfDevice, DecodedDeviceClass, DeviceClassRecord, MajorDeviceClass, MinorDeviceClass,
    ServiceClass, ServiceClassSet, decode, format_hex, parse_and_decode, parse_hex,
};
#[cfg(feature = "serde")]
pub use class::{describe_hex, describe_hex_pretty};
pub use error::{ParseError, ParseResult};
pub use types::{DeviceHandle, DeviceProperties, DeviceServices, ServiceDescriptor};
