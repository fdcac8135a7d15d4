//! Helpers for turning btleplug identifiers into display strings.

use btleplug::platform::PeripheralId;

/// The address CoreBluetooth reports for every peripheral.
const HIDDEN_ADDRESS: &str = "00:00:00:00:00:00";

/// Format a peripheral ID as a string.
///
/// On Linux this is the BlueZ object path, on macOS a UUID. The `Debug`
/// wrapper added by btleplug is stripped.
pub fn format_peripheral_id(id: &PeripheralId) -> String {
    strip_id_wrapper(&format!("{:?}", id)).to_string()
}

/// Pick the address to report for a device.
///
/// Platforms that hide Bluetooth addresses report all zeros; the peripheral
/// ID is used instead so records stay distinguishable.
pub fn device_address(address: &str, peripheral_id: &PeripheralId) -> String {
    if is_hidden_address(address) {
        format_peripheral_id(peripheral_id)
    } else {
        address.to_string()
    }
}

fn is_hidden_address(address: &str) -> bool {
    address == HIDDEN_ADDRESS
}

fn strip_id_wrapper(debug: &str) -> &str {
    debug
        .trim_start_matches("PeripheralId(")
        .trim_end_matches(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_address() {
        assert!(is_hidden_address("00:00:00:00:00:00"));
        assert!(!is_hidden_address("AA:BB:CC:DD:EE:FF"));
    }

    #[test]
    fn test_strip_id_wrapper() {
        assert_eq!(
            strip_id_wrapper("PeripheralId(/org/bluez/hci0/dev_AA_BB_CC_DD_EE_FF)"),
            "/org/bluez/hci0/dev_AA_BB_CC_DD_EE_FF"
        );
        assert_eq!(strip_id_wrapper("plain"), "plain");
    }
}
