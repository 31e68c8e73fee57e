//! Port registry: enumeration of candidate IR device ports.

use ir_core::{is_usb_serial_path, PortDescriptor};
use tokio_serial::{available_ports, SerialPortType};

use super::EnumerationError;

/// Enumerates serial devices visible to the OS, filtered to USB-attached
/// ports that follow the platform USB-serial naming convention.
///
/// Onboard UARTs and non-USB port types (PCI, Bluetooth) are excluded: the
/// IR boards always enumerate as USB devices. An empty vec is a valid,
/// non-error result — it simply means nothing is plugged in.
///
/// # Errors
///
/// Returns [`EnumerationError`] when the OS-level enumeration itself fails;
/// the failure is surfaced to the caller, not swallowed.
pub fn list_ports() -> Result<Vec<PortDescriptor>, EnumerationError> {
    let ports = available_ports()?;
    Ok(ports
        .into_iter()
        .filter_map(|port| match port.port_type {
            SerialPortType::UsbPort(usb) if is_usb_serial_path(&port.port_name) => {
                Some(PortDescriptor {
                    path: port.port_name,
                    manufacturer: usb.manufacturer.unwrap_or_default(),
                })
            }
            _ => None,
        })
        .collect())
}
