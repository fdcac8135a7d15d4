//! Command-line Bluetooth inquiry logger.
//!
//! The `bt-inquiry` binary runs discovery every few seconds and logs one
//! record per device found, with its Class of Device decoded into service
//! classes and major/minor device classes.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `run` | Run the inquiry loop until Ctrl-C (default) |
//! | `decode` | Decode a hex Class of Device value to JSON |
//!
//! # Configuration
//!
//! Settings are read from `bt-inquiry/config.toml` under the platform config
//! directory (e.g. `~/.config/bt-inquiry/config.toml`), or from the file
//! given with `--config`. Flags override the file. See [`config::Config`].
//!
//! # Logging
//!
//! Records go to the console and to `log/bt-inquiry.log`. The file is
//! rotated at 10 MB and rotated files are gzip-compressed.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter, overriding the configured level
//!
//! # Examples
//!
//! Log devices every 30 seconds using adapter `hci1`:
//! ```bash
//! bt-inquiry --interval 30 --adapter hci1
//! ```
//!
//! Decode a Class of Device:
//! ```bash
//! bt-inquiry decode 0x240418
//! ```

pub mod config;
pub mod logging;
pub mod rotation;

pub use inquiry_core;
pub use inquiry_types;
