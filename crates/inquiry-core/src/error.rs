//! Error types for inquiry-core.
//!
//! # Which errors end the inquiry loop
//!
//! | Error | Raised by | Effect |
//! |-------|-----------|--------|
//! | [`Error::Bluetooth`] | start/stop discovery, device listing | Propagated, loop ends |
//! | [`Error::NoAdapter`] | [`crate::PlatformAdapter::first`] | Propagated, nothing to scan with |
//! | [`Error::AdapterNotFound`] | [`crate::PlatformAdapter::named`] | Propagated, nothing to scan with |
//! | [`Error::ServiceLookup`] | per-device service lookup | Recovered with the "No services found" placeholder |
//! | [`Error::DeviceNotFound`] | per-device service lookup | Recovered with the "No services found" placeholder |
//! | [`Error::InvalidConfig`] | option validation | Propagated, fix and restart |
//!
//! There is no retry policy. A failed discovery cycle ends
//! [`crate::DiscoveryLoop::run`]; restarting is left to the process supervisor.

use thiserror::Error;

/// Errors that can occur while driving a Bluetooth inquiry.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Error reported by the platform Bluetooth stack.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// The platform has no Bluetooth adapter.
    #[error("No Bluetooth adapter available")]
    NoAdapter,

    /// No adapter matched the requested name.
    #[error("Bluetooth adapter '{0}' not found")]
    AdapterNotFound(String),

    /// The adapter does not know the requested device.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Retrieving a device's service list failed.
    #[error("Service lookup failed for {handle}: {reason}")]
    ServiceLookup {
        /// The device whose services were requested.
        handle: String,
        /// Description of the failure.
        reason: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a service lookup error.
    pub fn service_lookup(handle: impl ToString, reason: impl Into<String>) -> Self {
        Self::ServiceLookup {
            handle: handle.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result type alias using inquiry-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
