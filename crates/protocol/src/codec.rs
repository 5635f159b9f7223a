//! Property request/response framing
//!
//! GET and SET exchanges are a single packet each way. Requests put the
//! opcode and property id in the first three bytes; responses carry a status
//! byte at offset 2 (zero means success) and, for GET, the 16-bit value
//! little-endian at offsets 3-4.

use crate::error::{ProtocolError, Result};
use crate::wire;

/// Offset of the status byte in a response packet
pub const STATUS_OFFSET: usize = 2;

/// Offset of the little-endian value in a GET response
pub const VALUE_OFFSET: usize = 3;

/// Build a GET request packet: `[MAGIC, GET, prop, 0, ...]` zero-padded to
/// the device's outbound packet size.
pub fn get_request(packet_size: usize, prop: u8) -> Vec<u8> {
    debug_assert!(packet_size >= wire::MIN_PACKET_SIZE);
    let mut packet = vec![0u8; packet_size];
    packet[0] = wire::MAGIC;
    packet[1] = wire::GET;
    packet[2] = prop;
    packet
}

/// Build a SET request packet: `[MAGIC, SET, prop, 0, value_lo, value_hi, ...]`
/// zero-padded to the device's outbound packet size.
pub fn set_request(packet_size: usize, prop: u8, value: u16) -> Vec<u8> {
    debug_assert!(packet_size >= wire::MIN_PACKET_SIZE);
    let mut packet = vec![0u8; packet_size];
    packet[0] = wire::MAGIC;
    packet[1] = wire::SET;
    packet[2] = prop;
    let [lo, hi] = value.to_le_bytes();
    packet[4] = lo;
    packet[5] = hi;
    packet
}

/// Extract the status byte from a response packet.
///
/// A response shorter than the status field is a truncated (garbled)
/// response, which the device layer surfaces as a transport failure.
pub fn response_status(response: &[u8]) -> Result<u8> {
    if response.len() <= STATUS_OFFSET {
        return Err(ProtocolError::TruncatedResponse {
            expected: STATUS_OFFSET + 1,
            actual: response.len(),
        });
    }
    Ok(response[STATUS_OFFSET])
}

/// Decode a GET response into its 16-bit property value.
///
/// A non-zero status byte is reported as [`ProtocolError::ErrorStatus`];
/// the caller knows which property the exchange was for.
pub fn parse_property_response(response: &[u8]) -> Result<u16> {
    let status = response_status(response)?;
    if status != 0 {
        return Err(ProtocolError::ErrorStatus { status });
    }
    if response.len() < VALUE_OFFSET + 2 {
        return Err(ProtocolError::TruncatedResponse {
            expected: VALUE_OFFSET + 2,
            actual: response.len(),
        });
    }
    Ok(u16::from_le_bytes([
        response[VALUE_OFFSET],
        response[VALUE_OFFSET + 1],
    ]))
}
