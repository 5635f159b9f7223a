//! Device layer for the Bragi USB protocol
//!
//! This crate keeps the lifecycle bookkeeping for a dongle and its wireless
//! subdevices consistent under concurrent access, and drives the `protocol`
//! crate's packet layouts over an external transport shim.
//!
//! The pieces:
//!
//! - [`pool`] — a fixed-capacity pool of device slots, each with a
//!   lifecycle lock (status/identity) and a children-set lock (a dongle's
//!   subdevice array). Claiming a free slot is trylock-based and never
//!   waits on a busy peer.
//! - [`shim`] — the [`shim::UsbShim`] trait the owning daemon implements:
//!   synchronous transact, close, and setup.
//! - [`properties`] — single-transaction property GET/SET drivers.
//! - [`writer`] — the multi-packet chunked-write driver.
//! - [`discovery`] — reconciles a dongle's presence bitmask against its
//!   children and the pool; at most one new child is brought up per call.
//!
//! All operations are blocking and none retries; failures propagate as
//! typed [`Error`] values to the immediate caller.

pub mod discovery;
pub mod error;
pub mod pool;
pub mod properties;
pub mod shim;
pub mod writer;

#[cfg(test)]
mod testing;

pub use discovery::update_dongle_subdevices;
pub use error::{Error, Result};
pub use pool::{
    ClaimedSlot, CommandTable, DevicePool, DeviceState, DeviceStatus, FIRMWARE_UNSET, SlotId,
};
pub use properties::{get_property, set_property};
pub use shim::{TransportError, UsbShim};
pub use writer::write_to_handle;
