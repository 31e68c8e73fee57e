//! Serial port descriptors and the USB-serial path filter.
//!
//! Enumeration itself lives in the daemon's infrastructure layer (it talks to
//! the OS); the *policy* of which device paths count as USB-attached serial
//! ports is a pure function kept here so it can be unit-tested without
//! hardware.

use serde::{Deserialize, Serialize};

/// One enumerated serial device.
///
/// Produced fresh on every enumeration call and never persisted — device
/// paths are not stable across replug/reboot on most platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDescriptor {
    /// OS device path, e.g. `/dev/ttyACM0` or `COM3`.
    pub path: String,
    /// Manufacturer string reported by the USB descriptor, if any.
    pub manufacturer: String,
}

/// Returns `true` when `path` follows the platform's USB-attached serial
/// naming convention.
///
/// Onboard/legacy UARTs (`/dev/ttyS*`, `/dev/ttyAMA*`) are excluded: the IR
/// boards always enumerate as USB CDC-ACM or a USB-serial adapter.
///
/// | Platform | Accepted prefixes                      |
/// |----------|----------------------------------------|
/// | Linux    | `/dev/ttyACM`, `/dev/ttyUSB`           |
/// | macOS    | `/dev/cu.usbmodem`, `/dev/cu.usbserial`|
/// | Windows  | `COM` (USB-ness is checked by the enumerator's port type) |
pub fn is_usb_serial_path(path: &str) -> bool {
    path.starts_with("/dev/ttyACM")
        || path.starts_with("/dev/ttyUSB")
        || path.starts_with("/dev/cu.usbmodem")
        || path.starts_with("/dev/cu.usbserial")
        || path.starts_with("COM")
}
