//! Bragi wire constants
//!
//! Byte values for the fixed-offset packet layout. Every packet is exactly
//! the device's outbound endpoint size; unused trailing bytes are zero.

/// First byte of every Bragi packet
pub const MAGIC: u8 = 0x08;

/// Opcode: set a 16-bit property
pub const SET: u8 = 0x01;

/// Opcode: get a 16-bit property
pub const GET: u8 = 0x02;

/// Opcode: first packet of a chunked write to a handle
pub const WRITE_DATA: u8 = 0x06;

/// Opcode: continuation packet of a chunked write
pub const CONTINUE_WRITE: u8 = 0x07;

/// Handle stamped into every continuation header, regardless of which
/// handle the write was opened against
pub const LIGHTING_HANDLE: u8 = 0x00;

/// Smallest outbound packet size the protocol can be framed in.
///
/// The first write packet reserves 7 header bytes and must still carry at
/// least one payload byte.
pub const MIN_PACKET_SIZE: usize = 8;

/// A dongle hosts at most seven subdevices, child ids 1 through 7.
///
/// Bit `i` of the presence bitmask reports child `i`; bit 0 is the dongle
/// itself and is ignored by discovery.
pub const MAX_SUBDEVICES: usize = 7;

/// Property ids used by the device layer
pub mod property {
    /// USB vendor id of the (sub)device
    pub const VID: u8 = 0x11;

    /// USB product id of the (sub)device
    pub const PID: u8 = 0x12;

    /// Bitmask of currently attached subdevices, reported by the dongle
    pub const SUBDEVICE_BITFIELD: u8 = 0x36;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcodes_distinct() {
        let ops = [SET, GET, WRITE_DATA, CONTINUE_WRITE];
        for (i, a) in ops.iter().enumerate() {
            for b in &ops[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_min_packet_fits_first_header() {
        assert!(MIN_PACKET_SIZE > crate::framer::FIRST_HEADER_LEN);
    }
}
