//! Transport shim interface
//!
//! The raw USB transport is an external collaborator: the daemon that owns
//! the endpoints implements [`UsbShim`] and the drivers in this crate only
//! see the synchronous send-and-wait seam. This keeps the protocol core
//! I/O-free and lets tests substitute a scripted shim.

use crate::pool::{ClaimedSlot, DeviceState};
use protocol::ProtocolError;
use thiserror::Error;

/// Transport-level failures: no response, or a response the fixed packet
/// layout cannot be read from. Always aborts the in-progress operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Device did not answer within the transport's own deadline
    #[error("no response from device")]
    NoResponse,

    /// Device disappeared mid-transaction
    #[error("device disconnected")]
    Disconnected,

    /// Response too short for the protocol's fixed field layout
    #[error("garbled response ({len} bytes)")]
    Garbled { len: usize },

    /// Anything else the transport wants to report
    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Map a protocol parse failure onto the transport taxonomy.
    ///
    /// A truncated response is garbled transport output, not a device
    /// status; device statuses never take this path.
    pub(crate) fn from_parse(err: ProtocolError) -> Self {
        match err {
            ProtocolError::TruncatedResponse { actual, .. } => Self::Garbled { len: actual },
            other => Self::Other(other.to_string()),
        }
    }
}

/// External USB collaborator consumed by the drivers in this crate.
///
/// All methods are synchronous and blocking; the core performs no retries
/// and imposes no timeouts of its own.
pub trait UsbShim {
    /// Send one packet and wait for the device's response packet.
    ///
    /// The packet is exactly `device.out_packet_size` bytes.
    fn transact(&self, device: &DeviceState, packet: &[u8]) -> Result<Vec<u8>, TransportError>;

    /// Tear down the transport for a device being disconnected.
    ///
    /// Called from the disconnect sweep with the device's lifecycle lock
    /// held; the sweep resets the state fields itself afterwards.
    fn close(&self, device: &mut DeviceState);

    /// Complete bring-up of a freshly claimed subdevice.
    ///
    /// Receives the still-held lifecycle guard; advancing the device from
    /// Connecting to Connected and releasing the guard are this
    /// collaborator's responsibility, outside the discovery protocol's
    /// lock-holding window.
    fn setup(&self, device: ClaimedSlot<'_>);
}
