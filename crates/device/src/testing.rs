//! Shared test helpers: a scripted transport shim and pool builders.

use crate::pool::{ClaimedSlot, CommandTable, DevicePool, DeviceState, DeviceStatus, SlotId};
use crate::shim::{TransportError, UsbShim};
use parking_lot::Mutex;
use protocol::{codec, wire};
use std::collections::{HashMap, VecDeque};

/// Install a fmt subscriber for tests that want to see tracing output.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Pool whose slot 0 is a connected dongle.
pub fn dongle_pool(capacity: usize) -> (DevicePool, SlotId) {
    let pool = DevicePool::new(capacity);
    let dongle = SlotId(0);
    {
        let mut state = pool.state(dongle).lock();
        state.status = DeviceStatus::Connected;
        state.table = CommandTable::Dongle;
    }
    (pool, dongle)
}

/// One scripted answer for the next transaction
pub enum MockReply {
    /// Zero-filled response with this status byte
    Status(u8),
    /// Success response carrying this value at the GET value offset
    Value(u16),
    /// Response with exactly these bytes
    Raw(Vec<u8>),
    /// Transport-level failure
    Fail(TransportError),
}

/// Scripted transport shim.
///
/// Replies are served from the script queue first. When the queue is empty,
/// GET requests are answered from the property table (error status 0x01 for
/// unknown properties, so a missing fixture surfaces in the test) and
/// everything else gets a zero-status ack. Every transmitted packet and
/// every close/setup call is recorded.
#[derive(Default)]
pub struct MockShim {
    script: Mutex<VecDeque<MockReply>>,
    properties: Mutex<HashMap<u8, u16>>,
    sent: Mutex<Vec<Vec<u8>>>,
    closed: Mutex<Vec<Option<u8>>>,
    setups: Mutex<Vec<SlotId>>,
}

impl MockShim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer GETs for `prop` with `value`.
    pub fn with_property(self, prop: u8, value: u16) -> Self {
        self.properties.lock().insert(prop, value);
        self
    }

    /// Queue a scripted reply for the next transaction.
    pub fn push_reply(&self, reply: MockReply) {
        self.script.lock().push_back(reply);
    }

    /// All packets transmitted so far, in order.
    pub fn sent_packets(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }

    /// Child ids of the devices closed so far.
    pub fn close_calls(&self) -> Vec<Option<u8>> {
        self.closed.lock().clone()
    }

    /// Slots handed to setup so far.
    pub fn setup_calls(&self) -> Vec<SlotId> {
        self.setups.lock().clone()
    }

    fn reply_for(&self, packet: &[u8]) -> Result<Vec<u8>, TransportError> {
        let size = packet.len();
        if let Some(reply) = self.script.lock().pop_front() {
            return match reply {
                MockReply::Status(status) => Ok(status_response(size, status)),
                MockReply::Value(value) => Ok(value_response(size, value)),
                MockReply::Raw(bytes) => Ok(bytes),
                MockReply::Fail(err) => Err(err),
            };
        }
        if size > 2 && packet[1] == wire::GET {
            return match self.properties.lock().get(&packet[2]) {
                Some(&value) => Ok(value_response(size, value)),
                None => Ok(status_response(size, 0x01)),
            };
        }
        Ok(status_response(size, 0))
    }
}

impl UsbShim for MockShim {
    fn transact(&self, _device: &DeviceState, packet: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.sent.lock().push(packet.to_vec());
        self.reply_for(packet)
    }

    fn close(&self, device: &mut DeviceState) {
        self.closed.lock().push(device.child_id);
    }

    fn setup(&self, mut device: ClaimedSlot<'_>) {
        self.setups.lock().push(device.id());
        // Model the external bring-up: advance to Connected, then drop the
        // guard to release the handed-off lifecycle lock.
        device.status = DeviceStatus::Connected;
    }
}

fn status_response(size: usize, status: u8) -> Vec<u8> {
    let mut response = vec![0u8; size];
    response[codec::STATUS_OFFSET] = status;
    response
}

fn value_response(size: usize, value: u16) -> Vec<u8> {
    let mut response = status_response(size, 0);
    response[codec::VALUE_OFFSET..codec::VALUE_OFFSET + 2].copy_from_slice(&value.to_le_bytes());
    response
}
