//! Wire layer for the Bragi USB protocol
//!
//! This crate defines the Bragi application-layer protocol spoken by a class
//! of USB dongles and their wireless subdevices: property GET/SET exchanges
//! and chunked bulk writes (lighting data and similar payloads) carried in
//! fixed-size packets.
//!
//! The crate is I/O-free: it builds request packets, parses responses, and
//! computes the buffer segmentation for multi-packet writes. Actually moving
//! packets over USB is the job of the `device` crate's transport shim.
//!
//! # Example
//!
//! ```
//! use protocol::codec::{get_request, parse_property_response};
//! use protocol::wire;
//!
//! // Build a GET request for the vendor id property on a 64-byte endpoint.
//! let request = get_request(64, wire::property::VID);
//! assert_eq!(&request[..3], &[wire::MAGIC, wire::GET, wire::property::VID]);
//!
//! // Decode a response carrying 0x1B1C with a zero (success) status.
//! let mut response = vec![0u8; 64];
//! response[3] = 0x1C;
//! response[4] = 0x1B;
//! assert_eq!(parse_property_response(&response).unwrap(), 0x1B1C);
//! ```
//!
//! # Chunked writes
//!
//! A payload larger than one packet is sent as a first packet with a 7-byte
//! header followed by continuation packets with 3-byte headers. The caller
//! allocates exactly [`framer::required_buffer_size`] bytes up front and the
//! continuation headers are stamped in place over bytes that have already
//! been transmitted, so the payload is never copied a second time.
//!
//! ```
//! use protocol::framer::required_buffer_size;
//!
//! assert_eq!(required_buffer_size(64, 100), 128); // 2 packets
//! assert_eq!(required_buffer_size(64, 400), 448); // 7 packets
//! ```

pub mod codec;
pub mod error;
pub mod framer;
pub mod wire;

pub use error::{ProtocolError, Result};
