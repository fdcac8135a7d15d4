//! Bluetooth Class of Device (CoD) decoding.
//!
//! The Class of Device is a 24-bit field broadcast during inquiry. It packs
//! three pieces of information:
//!
//! | Bits | Field | Decoding |
//! |------|-------|----------|
//! | 23-13 | Major service classes | independent flags |
//! | 12-8 | Major device class | exact match against a table |
//! | 7-2 | Minor device class | exact match, table chosen by the major class |
//!
//! Decoding is total: any integer decodes, and bits that match nothing fall
//! back to `"None"`, `"Unknown"` or `"Uncategorized"`. Bits above 23 are
//! ignored by every mask.
//!
//! Only the Computer and Phone major classes carry a minor class table here;
//! the remaining major classes always report `"Uncategorized"`.
//!
//! # Example
//!
//! ```
//! use inquiry_types::class::{decode, MajorDeviceClass};
//!
//! let decoded = decode(0x240418);
//! assert_eq!(decoded.service_classes.to_string(), "Network, Object Transfer");
//! assert_eq!(decoded.major, MajorDeviceClass::AudioVideo);
//! assert_eq!(decoded.minor.as_str(), "Uncategorized");
//! ```

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// Mask selecting the major device class field (bits 12-8).
pub const MAJOR_DEVICE_CLASS_MASK: u32 = 0x1F00;

/// Mask selecting the minor device class field (bits 7-2).
pub const MINOR_DEVICE_CLASS_MASK: u32 = 0x00FC;

/// Rendering of an empty [`ServiceClassSet`].
pub const NO_SERVICE_CLASSES: &str = "None";

/// A single major service class flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ServiceClass {
    Network,
    Audio,
    Telephony,
    ObjectTransfer,
    Capturing,
    Rendering,
    Positioning,
    Networking,
    Broadcasting,
    LimitedDiscoverableMode,
}

/// Service class flags in the order they are reported.
static SERVICE_CLASSES: [(u32, ServiceClass); 10] = [
    (0x20_0000, ServiceClass::Network),
    (0x10_0000, ServiceClass::Audio),
    (0x08_0000, ServiceClass::Telephony),
    (0x04_0000, ServiceClass::ObjectTransfer),
    (0x02_0000, ServiceClass::Capturing),
    (0x01_0000, ServiceClass::Rendering),
    (0x00_8000, ServiceClass::Positioning),
    (0x00_4000, ServiceClass::Networking),
    (0x00_2000, ServiceClass::Broadcasting),
    (0x00_1000, ServiceClass::LimitedDiscoverableMode),
];

impl ServiceClass {
    /// All service classes, in reporting order.
    pub fn all() -> impl Iterator<Item = ServiceClass> {
        SERVICE_CLASSES.iter().map(|&(_, class)| class)
    }

    /// The single-bit mask of this service class.
    #[must_use]
    pub fn mask(self) -> u32 {
        SERVICE_CLASSES
            .iter()
            .find(|&&(_, class)| class == self)
            .map_or(0, |&(mask, _)| mask)
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ServiceClass::Network => "Network",
            ServiceClass::Audio => "Audio",
            ServiceClass::Telephony => "Telephony",
            ServiceClass::ObjectTransfer => "Object Transfer",
            ServiceClass::Capturing => "Capturing",
            ServiceClass::Rendering => "Rendering",
            ServiceClass::Positioning => "Positioning",
            ServiceClass::Networking => "Networking",
            ServiceClass::Broadcasting => "Broadcasting",
            ServiceClass::LimitedDiscoverableMode => "Limited Discoverable Mode",
        }
    }
}

impl fmt::Display for ServiceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of service classes advertised by a device.
///
/// Iteration and rendering always follow the fixed reporting order,
/// regardless of which bits are set. An empty set renders as `"None"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ServiceClassSet {
    bits: u32,
}

impl ServiceClassSet {
    /// Collect the service class flags present in a raw Class of Device value.
    #[must_use]
    pub fn from_class(device_class: u32) -> Self {
        let bits = SERVICE_CLASSES
            .iter()
            .filter(|&&(mask, _)| device_class & mask != 0)
            .fold(0, |acc, &(mask, _)| acc | mask);
        Self { bits }
    }

    /// Returns `true` if no service class flag is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of service classes in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if `class` is in the set.
    #[must_use]
    pub fn contains(&self, class: ServiceClass) -> bool {
        self.bits & class.mask() != 0
    }

    /// Iterate the service classes in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = ServiceClass> + '_ {
        SERVICE_CLASSES
            .iter()
            .filter(|&&(mask, _)| self.bits & mask != 0)
            .map(|&(_, class)| class)
    }
}

impl fmt::Display for ServiceClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(NO_SERVICE_CLASSES);
        }
        for (i, class) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(class.name())?;
        }
        Ok(())
    }
}

/// A minor class lookup table: `(value & MINOR_DEVICE_CLASS_MASK, name)`.
pub type MinorClassTable = &'static [(u32, &'static str)];

static COMPUTER_MINOR_CLASSES: [(u32, &str); 7] = [
    (0x00, "-"),
    (0x04, "Desktop Workstation"),
    (0x08, "Server"),
    (0x0C, "Laptop"),
    (0x10, "Handheld PC/PDA"),
    (0x14, "Palm Sized PC/PDA"),
    (0x18, "Wearable computer (watch)"),
];

static PHONE_MINOR_CLASSES: [(u32, &str); 6] = [
    (0x00, "Uncategorized"),
    (0x04, "Cellular"),
    (0x08, "Cordless"),
    (0x0C, "Smartphone"),
    (0x10, "Wired Modem or Voice Gateway"),
    (0x14, "Common ISDN Access"),
];

/// Top-level device category.
///
/// Values outside `0x0100..=0x0900` (including reserved codes such as
/// `0x0A00` and the uncategorized `0x1F00`) decode as [`MajorDeviceClass::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MajorDeviceClass {
    Computer,
    Phone,
    LanAccessPoint,
    AudioVideo,
    Peripheral,
    Imaging,
    Wearable,
    Toy,
    Health,
    Unknown,
}

static MAJOR_DEVICE_CLASSES: [(u32, MajorDeviceClass); 9] = [
    (0x0100, MajorDeviceClass::Computer),
    (0x0200, MajorDeviceClass::Phone),
    (0x0300, MajorDeviceClass::LanAccessPoint),
    (0x0400, MajorDeviceClass::AudioVideo),
    (0x0500, MajorDeviceClass::Peripheral),
    (0x0600, MajorDeviceClass::Imaging),
    (0x0700, MajorDeviceClass::Wearable),
    (0x0800, MajorDeviceClass::Toy),
    (0x0900, MajorDeviceClass::Health),
];

impl MajorDeviceClass {
    /// Select the major class by exact match of bits 12-8.
    #[must_use]
    pub fn from_class(device_class: u32) -> Self {
        let code = device_class & MAJOR_DEVICE_CLASS_MASK;
        MAJOR_DEVICE_CLASSES
            .iter()
            .find(|&&(value, _)| value == code)
            .map_or(MajorDeviceClass::Unknown, |&(_, major)| major)
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MajorDeviceClass::Computer => "Computer",
            MajorDeviceClass::Phone => "Phone",
            MajorDeviceClass::LanAccessPoint => "LAN/Network Access Point",
            MajorDeviceClass::AudioVideo => "Audio/Video",
            MajorDeviceClass::Peripheral => "Peripheral",
            MajorDeviceClass::Imaging => "Imaging",
            MajorDeviceClass::Wearable => "Wearable",
            MajorDeviceClass::Toy => "Toy",
            MajorDeviceClass::Health => "Health",
            MajorDeviceClass::Unknown => "Unknown",
        }
    }

    /// The minor class table for this category, if one is defined.
    #[must_use]
    pub fn minor_table(self) -> Option<MinorClassTable> {
        match self {
            MajorDeviceClass::Computer => Some(&COMPUTER_MINOR_CLASSES),
            MajorDeviceClass::Phone => Some(&PHONE_MINOR_CLASSES),
            _ => None,
        }
    }
}

impl fmt::Display for MajorDeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finer-grained device category within a [`MajorDeviceClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinorDeviceClass(&'static str);

impl MinorDeviceClass {
    /// Fallback when the major class has no table or the code is unknown.
    pub const UNCATEGORIZED: MinorDeviceClass = MinorDeviceClass("Uncategorized");

    /// Resolve bits 7-2 against the table carried by `major`.
    #[must_use]
    pub fn resolve(major: MajorDeviceClass, device_class: u32) -> Self {
        let code = device_class & MINOR_DEVICE_CLASS_MASK;
        major
            .minor_table()
            .and_then(|table| table.iter().find(|&&(value, _)| value == code))
            .map_or(Self::UNCATEGORIZED, |&(_, name)| MinorDeviceClass(name))
    }

    /// Human-readable name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for MinorDeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The decoded form of a Class of Device value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedDeviceClass {
    /// Advertised major service classes.
    pub service_classes: ServiceClassSet,
    /// Top-level device category.
    pub major: MajorDeviceClass,
    /// Device subcategory.
    pub minor: MinorDeviceClass,
}

impl DecodedDeviceClass {
    /// Flatten into the three-field text record.
    #[must_use]
    pub fn to_record(&self) -> DeviceClassRecord {
        DeviceClassRecord {
            major_service_class: self.service_classes.to_string(),
            major_device_class: self.major.name().to_string(),
            minor_device_class: self.minor.as_str().to_string(),
        }
    }
}

impl fmt::Display for DecodedDeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Major Service Class: {}, Major Device Class: {}, Minor Device Class: {}",
            self.service_classes, self.major, self.minor
        )
    }
}

/// Flat key/value record of a decoded class.
///
/// Serializes as a JSON object with the field names `"Major Service Class"`,
/// `"Major Device Class"` and `"Minor Device Class"`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceClassRecord {
    #[cfg_attr(feature = "serde", serde(rename = "Major Service Class"))]
    pub major_service_class: String,
    #[cfg_attr(feature = "serde", serde(rename = "Major Device Class"))]
    pub major_device_class: String,
    #[cfg_attr(feature = "serde", serde(rename = "Minor Device Class"))]
    pub minor_device_class: String,
}

impl From<DecodedDeviceClass> for DeviceClassRecord {
    fn from(decoded: DecodedDeviceClass) -> Self {
        decoded.to_record()
    }
}

/// A raw Class of Device value.
///
/// Displays as `0x` followed by six upper-case hex digits.
///
/// ```
/// use inquiry_types::ClassOfDevice;
///
/// let class: ClassOfDevice = "0x5a020c".parse().unwrap();
/// assert_eq!(class.to_string(), "0x5A020C");
/// assert_eq!(class.decode().major.name(), "Phone");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ClassOfDevice(u32);

impl ClassOfDevice {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Decode into service, major and minor classes.
    #[must_use]
    pub fn decode(self) -> DecodedDeviceClass {
        decode(self.0)
    }
}

impl From<u32> for ClassOfDevice {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ClassOfDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}

impl FromStr for ClassOfDevice {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}

/// Decode a raw Class of Device value.
///
/// Never fails; unmatched fields fall back to their default names.
#[must_use]
pub fn decode(device_class: u32) -> DecodedDeviceClass {
    let major = MajorDeviceClass::from_class(device_class);
    DecodedDeviceClass {
        service_classes: ServiceClassSet::from_class(device_class),
        major,
        minor: MinorDeviceClass::resolve(major, device_class),
    }
}

/// Parse a hexadecimal Class of Device string such as `"0x240418"` or `"240418"`.
///
/// Surrounding whitespace, a leading `+` and an optional `0x`/`0X` prefix are
/// accepted. Any number of hex digits is valid; only the low 32 bits are
/// kept, and the decoder ignores everything above bit 23 anyway.
pub fn parse_hex(text: &str) -> ParseResult<ClassOfDevice> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
        .unwrap_or(unsigned);

    if digits.is_empty() {
        return Err(ParseError::Empty);
    }

    // A lone non-hex character always fails, reporting InvalidDigit
    let low = match digits.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        Some((pos, c)) => &digits[pos..pos + c.len_utf8()],
        None => &digits[digits.len().saturating_sub(8)..],
    };

    u32::from_str_radix(low, 16)
        .map(ClassOfDevice)
        .map_err(|source| ParseError::InvalidHex {
            input: text.to_string(),
            source,
        })
}

/// Parse a hexadecimal Class of Device string and decode it.
pub fn parse_and_decode(text: &str) -> ParseResult<DecodedDeviceClass> {
    parse_hex(text).map(ClassOfDevice::decode)
}

/// Render a raw value the way [`parse_hex`] reads it back.
#[must_use]
pub fn format_hex(device_class: u32) -> String {
    ClassOfDevice(device_class).to_string()
}

/// Parse, decode and serialize a hexadecimal Class of Device as a JSON record.
///
/// ```
/// let json = inquiry_types::class::describe_hex("0x000104").unwrap();
/// assert_eq!(
///     json,
///     r#"{"Major Service Class":"None","Major Device Class":"Computer","Minor Device Class":"Desktop Workstation"}"#
/// );
/// ```
#[cfg(feature = "serde")]
pub fn describe_hex(text: &str) -> ParseResult<String> {
    let record = parse_and_decode(text)?.to_record();
    Ok(serde_json::to_string(&record).expect("class record always serializes"))
}

/// Like [`describe_hex`], with the JSON indented over several lines.
#[cfg(feature = "serde")]
pub fn describe_hex_pretty(text: &str) -> ParseResult<String> {
    let record = parse_and_decode(text)?.to_record();
    Ok(serde_json::to_string_pretty(&record).expect("class record always serializes"))
}
