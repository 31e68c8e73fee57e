//! Transmit commands and their serial wire line.

use serde::Deserialize;

/// One IR replay request, as accepted by the transmitter firmware.
///
/// Constructed from a caller request, serialized to one line, written to the
/// transmitter connection, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransmitCommand {
    /// IR protocol name understood by the firmware, e.g. `NEC`, `SONY`.
    pub protocol: String,
    /// Number of significant bits in `code`.
    pub bit_length: u32,
    /// The code to replay, hex or protocol-specific encoding, e.g. `0x20DF10EF`.
    pub code: String,
}

impl TransmitCommand {
    /// Serializes the command to the exact line written to the transmitter:
    /// `"{protocol},{bit_length},{code}\n"`.
    ///
    /// The format is fixed by the firmware; the trailing `\n` terminates the
    /// command on the device side.
    pub fn to_wire_line(&self) -> String {
        format!("{},{},{}\n", self.protocol, self.bit_length, self.code)
    }
}
