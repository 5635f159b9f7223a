//! Device layer error types

use crate::shim::TransportError;
use thiserror::Error;

/// Errors surfaced by the property, write, and discovery drivers.
///
/// Nothing here is retried; every failure propagates to the immediate
/// caller after a single transaction attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The transport produced no usable response; aborts the operation
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The device answered a property exchange with a non-zero status byte
    #[error("property {property:#04x} failed with device status {status:#04x}")]
    Property { property: u8, status: u8 },

    /// Caller passed a write buffer smaller than the sizing formula requires.
    ///
    /// This is a caller defect, not a runtime fault, and is rejected in all
    /// builds before anything is transmitted.
    #[error("write buffer too small: needs {needed} bytes, got {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Payload length does not fit the 4-byte wire length field
    #[error("payload of {len} bytes exceeds the 4-byte length field")]
    PayloadTooLarge { len: usize },
}

/// Type alias for device layer results
pub type Result<T> = std::result::Result<T, Error>;
