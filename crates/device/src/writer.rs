//! Chunked-write driver
//!
//! Drives a multi-packet write over the transport shim using the window
//! layout from [`protocol::framer`]. The caller allocates the buffer once,
//! zeroes the first seven bytes, and places the payload at offset seven;
//! continuation headers are stamped in place over bytes that were already
//! transmitted in the previous packet.

use crate::error::{Error, Result};
use crate::pool::DeviceState;
use crate::shim::{TransportError, UsbShim};
use protocol::{codec, framer};
use tracing::warn;

/// Write `payload_len` payload bytes from `buffer` to `handle` on a device.
///
/// `buffer` must be at least [`framer::required_buffer_size`] bytes with the
/// payload starting at offset [`framer::FIRST_HEADER_LEN`]; anything smaller
/// is a caller defect rejected before any packet is sent. The buffer is
/// owned exclusively by this call; callers serialize writes per device
/// themselves, no per-device write lock is taken here.
///
/// A transport failure aborts immediately. A non-zero status byte on a
/// continuation packet is logged and the transmission continues, since the
/// recoverability of individual status codes is not established.
pub fn write_to_handle(
    shim: &dyn UsbShim,
    device: &DeviceState,
    buffer: &mut [u8],
    handle: u8,
    payload_len: usize,
) -> Result<()> {
    let packet_size = device.out_packet_size;

    let needed = framer::required_buffer_size(packet_size, payload_len);
    if buffer.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            available: buffer.len(),
        });
    }
    let wire_len =
        u32::try_from(payload_len).map_err(|_| Error::PayloadTooLarge { len: payload_len })?;

    framer::write_first_header(buffer, handle, wire_len);
    // The first packet's status byte is not inspected; only the transport
    // result can abort here.
    shim.transact(device, &buffer[..packet_size])?;

    for start in framer::continuation_starts(packet_size, payload_len) {
        framer::write_continuation_header(buffer, start);
        let response = shim.transact(device, &buffer[start..start + packet_size])?;
        match codec::response_status(&response) {
            Ok(0) => {}
            Ok(status) => {
                // Might be recoverable; the status code meanings are not
                // known yet, so keep sending.
                warn!(
                    "continuation write returned status {:#04x}, continuing",
                    status
                );
            }
            Err(parse) => return Err(TransportError::from_parse(parse).into()),
        }
    }

    Ok(())
}
