//! Chunked-write segmentation
//!
//! A write to a handle moves an arbitrarily long payload through a transport
//! that only carries fixed-size packets. The first packet spends 7 bytes on
//! a header (magic, opcode, handle, 4-byte little-endian payload length);
//! every continuation packet spends 3 (magic, opcode, lighting handle).
//!
//! To avoid copying the payload into per-packet buffers, the caller places
//! it once at offset [`FIRST_HEADER_LEN`] of a single buffer sized by
//! [`required_buffer_size`], and the packets are sent as overlapping windows
//! of that buffer: each continuation window starts 3 bytes before the end of
//! the previous one, and its header is stamped over those 3 bytes. The bytes
//! it overwrites were already transmitted in the previous packet, so no
//! payload is lost and no second allocation is made.

use crate::wire;

/// Header bytes reserved at the start of the first packet
pub const FIRST_HEADER_LEN: usize = 7;

/// Header bytes stamped at the start of each continuation packet
pub const CONTINUATION_HEADER_LEN: usize = 3;

/// Number of bytes a buffer must hold to carry `payload_len` payload bytes
/// as a sequence of `packet_size`-byte packets.
///
/// Always a multiple of `packet_size`, and the minimum such multiple given
/// that the first packet carries `packet_size - 7` payload bytes and each
/// continuation packet `packet_size - 3`. Callers must allocate exactly this
/// much, zero the first seven bytes, and place the payload contiguously at
/// offset seven; the slack past the payload is transmitted as zero padding.
pub fn required_buffer_size(packet_size: usize, payload_len: usize) -> usize {
    debug_assert!(packet_size >= wire::MIN_PACKET_SIZE);
    if payload_len + FIRST_HEADER_LEN <= packet_size {
        // Header and payload fit in a single zero-padded packet
        return packet_size;
    }
    let remainder = payload_len + FIRST_HEADER_LEN - packet_size;
    let continuation_packets = remainder.div_ceil(packet_size - CONTINUATION_HEADER_LEN);
    (1 + continuation_packets) * packet_size
}

/// Stamp the first-packet header into `buffer[..7]`.
pub fn write_first_header(buffer: &mut [u8], handle: u8, payload_len: u32) {
    debug_assert!(buffer.len() >= FIRST_HEADER_LEN);
    buffer[0] = wire::MAGIC;
    buffer[1] = wire::WRITE_DATA;
    buffer[2] = handle;
    buffer[3..FIRST_HEADER_LEN].copy_from_slice(&payload_len.to_le_bytes());
}

/// Stamp a continuation header into `buffer[start..start + 3]`.
///
/// Continuation packets always carry the lighting handle, not the handle the
/// write was opened against.
pub fn write_continuation_header(buffer: &mut [u8], start: usize) {
    debug_assert!(buffer.len() >= start + CONTINUATION_HEADER_LEN);
    buffer[start] = wire::MAGIC;
    buffer[start + 1] = wire::CONTINUE_WRITE;
    buffer[start + 2] = wire::LIGHTING_HANDLE;
}

/// Start offsets of the continuation windows for a payload.
///
/// Each yielded `start` names a window `start..start + packet_size` whose
/// first three bytes are overwritten by [`write_continuation_header`]. The
/// windows walk the buffer in steps of `packet_size - 3` until the payload
/// (which ends at `payload_len + 7`) is covered; every window stays within
/// [`required_buffer_size`] bytes.
pub fn continuation_starts(packet_size: usize, payload_len: usize) -> ContinuationStarts {
    debug_assert!(packet_size >= wire::MIN_PACKET_SIZE);
    ContinuationStarts {
        pos: packet_size,
        end: payload_len + FIRST_HEADER_LEN,
        packet_size,
    }
}

/// Iterator returned by [`continuation_starts`]
#[derive(Debug, Clone)]
pub struct ContinuationStarts {
    /// End of the last window laid out so far
    pos: usize,
    /// First offset past the payload
    end: usize,
    packet_size: usize,
}

impl Iterator for ContinuationStarts {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.pos >= self.end {
            return None;
        }
        // Back up over the tail of the previous window; those bytes have
        // already been transmitted and become the continuation header.
        let start = self.pos - CONTINUATION_HEADER_LEN;
        self.pos = start + self.packet_size;
        Some(start)
    }
}
