//! Property get/set drivers
//!
//! One synchronous transaction per call, no retries. A transport failure
//! and a non-zero device status byte are distinct error categories and both
//! surface immediately.

use crate::error::{Error, Result};
use crate::pool::DeviceState;
use crate::shim::{TransportError, UsbShim};
use protocol::{ProtocolError, codec};
use tracing::error;

/// Read a 16-bit property from a device.
pub fn get_property(shim: &dyn UsbShim, device: &DeviceState, prop: u8) -> Result<u16> {
    let request = codec::get_request(device.out_packet_size, prop);
    let response = shim.transact(device, &request)?;
    match codec::parse_property_response(&response) {
        Ok(value) => Ok(value),
        Err(ProtocolError::ErrorStatus { status }) => {
            error!(
                "failed to get property {:#04x}: device status {:#04x}",
                prop, status
            );
            Err(Error::Property {
                property: prop,
                status,
            })
        }
        Err(parse) => Err(TransportError::from_parse(parse).into()),
    }
}

/// Write a 16-bit property to a device. Success is device status zero.
pub fn set_property(shim: &dyn UsbShim, device: &DeviceState, prop: u8, value: u16) -> Result<()> {
    let request = codec::set_request(device.out_packet_size, prop, value);
    let response = shim.transact(device, &request)?;
    match codec::response_status(&response) {
        Ok(0) => Ok(()),
        Ok(status) => {
            error!(
                "failed to set property {:#04x}: device status {:#04x}",
                prop, status
            );
            Err(Error::Property {
                property: prop,
                status,
            })
        }
        Err(parse) => Err(TransportError::from_parse(parse).into()),
    }
}
