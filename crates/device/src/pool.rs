//! Device state and the shared device pool
//!
//! The pool is a fixed-capacity array of slots allocated once for the
//! process lifetime. Each slot carries two independent locks: a lifecycle
//! lock guarding the device's status and identity fields, and a
//! children-set lock guarding the slot array a dongle keeps for its
//! subdevices. Multiple threads reconcile devices against the pool
//! concurrently; claiming a free slot never blocks on a held lock.

use parking_lot::{Mutex, MutexGuard};
use protocol::wire::MAX_SUBDEVICES;
use std::ops::{Deref, DerefMut};

/// Firmware version sentinel until real probing completes
pub const FIRMWARE_UNSET: u16 = 1234;

/// Outbound packet size assumed before the parent's size is known
pub const DEFAULT_PACKET_SIZE: usize = 64;

/// Lifecycle status of a pool slot.
///
/// This crate drives only the Disconnected <-> Connecting transitions;
/// Connecting -> Connected is performed by the external setup collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeviceStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Which command dispatch table a device is driven through.
///
/// Newly discovered subdevices get a provisional `Mouse` table; the setup
/// collaborator swaps in the right one once VID/PID are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTable {
    Dongle,
    Mouse,
    Keyboard,
}

/// Index of a slot in the device pool.
///
/// Only minted by the pool itself; a `SlotId` is a member of at most one
/// parent's children array at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub usize);

/// Identity and lifecycle fields of one pool slot, guarded by the slot's
/// lifecycle lock.
#[derive(Debug, Clone)]
pub struct DeviceState {
    pub status: DeviceStatus,
    pub vendor_id: u16,
    pub product_id: u16,
    pub firmware_version: u16,
    /// Fixed size of every outbound packet for this device
    pub out_packet_size: usize,
    /// Owning dongle, absent for top-level devices
    pub parent: Option<SlotId>,
    /// 1-based child id reported in the dongle's presence bitmask
    pub child_id: Option<u8>,
    pub table: CommandTable,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            status: DeviceStatus::Disconnected,
            vendor_id: 0,
            product_id: 0,
            firmware_version: FIRMWARE_UNSET,
            out_packet_size: DEFAULT_PACKET_SIZE,
            parent: None,
            child_id: None,
            table: CommandTable::Mouse,
        }
    }
}

/// A dongle's subdevice slots, indexed by child id minus one
pub type ChildSlots = [Option<SlotId>; MAX_SUBDEVICES];

struct Slot {
    /// Lifecycle lock
    state: Mutex<DeviceState>,
    /// Children-set lock, meaningful when this slot is a dongle
    children: Mutex<ChildSlots>,
}

/// Fixed-capacity pool of device slots shared between threads
pub struct DevicePool {
    slots: Vec<Slot>,
}

impl DevicePool {
    /// Pre-allocate `capacity` disconnected slots.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                state: Mutex::new(DeviceState::default()),
                children: Mutex::new([None; MAX_SUBDEVICES]),
            })
            .collect();
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Lifecycle lock of a slot.
    ///
    /// # Panics
    /// Panics if `id` was not minted by this pool.
    pub fn state(&self, id: SlotId) -> &Mutex<DeviceState> {
        &self.slots[id.0].state
    }

    /// Children-set lock of a slot.
    ///
    /// # Panics
    /// Panics if `id` was not minted by this pool.
    pub fn children(&self, id: SlotId) -> &Mutex<ChildSlots> {
        &self.slots[id.0].children
    }

    /// Claim the first free slot without blocking.
    ///
    /// A slot is free when its lifecycle lock is not held and its status is
    /// Disconnected. Slots whose lock is held are in use by a peer and are
    /// skipped, never waited on, so two threads sweeping the pool at once
    /// cannot deadlock or double-claim. Returns the exclusive claim, or
    /// `None` when the pool is exhausted.
    pub fn claim_free(&self) -> Option<ClaimedSlot<'_>> {
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(state) = slot.state.try_lock() else {
                continue;
            };
            if state.status > DeviceStatus::Disconnected {
                continue;
            }
            return Some(ClaimedSlot {
                id: SlotId(index),
                state,
            });
        }
        None
    }
}

/// Exclusive claim on one pool slot: the slot id plus its still-held
/// lifecycle guard. Dropping the claim releases the lock.
pub struct ClaimedSlot<'a> {
    id: SlotId,
    state: MutexGuard<'a, DeviceState>,
}

impl ClaimedSlot<'_> {
    pub fn id(&self) -> SlotId {
        self.id
    }
}

impl Deref for ClaimedSlot<'_> {
    type Target = DeviceState;

    fn deref(&self) -> &DeviceState {
        &self.state
    }
}

impl DerefMut for ClaimedSlot<'_> {
    fn deref_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }
}
