//! Protocol error types

use thiserror::Error;

/// Protocol-level errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Response shorter than the fixed field layout requires.
    ///
    /// A truncated response means the transport delivered garbage; callers
    /// treat this as a transport-class failure, not a device status.
    #[error("truncated response: expected at least {expected} bytes, got {actual}")]
    TruncatedResponse { expected: usize, actual: usize },

    /// Device answered with a non-zero status byte
    #[error("device returned error status {status:#04x}")]
    ErrorStatus { status: u8 },
}

/// Type alias for protocol results
pub type Result<T> = std::result::Result<T, ProtocolError>;
