//! Dongle subdevice discovery
//!
//! Reconciles a dongle's hardware-reported presence bitmask against the
//! local children array and the shared device pool. Runs synchronously on
//! whichever thread observed the bitmask change, concurrently with other
//! threads working the same pool.
//!
//! Locking: the dongle's children-set lock is held for the whole reconcile
//! except around USB I/O. The disconnect sweep may block briefly on a
//! child's lifecycle lock (the holder is always another sweep, which
//! finishes). The connect sweep only ever try-locks pool slots; contention
//! means "try the next slot", never "wait", so two threads sweeping
//! different dongles cannot deadlock against each other.

use crate::error::Result;
use crate::pool::{ClaimedSlot, CommandTable, DevicePool, DeviceStatus, FIRMWARE_UNSET, SlotId};
use crate::properties::get_property;
use crate::shim::UsbShim;
use protocol::wire::{self, MAX_SUBDEVICES};
use tracing::{error, info};

/// Reconcile a dongle's children against a presence bitmask.
///
/// Bit `i` of `presence` (for `i` in 1..=7) reports whether child `i` is
/// attached; bit 0 is the dongle itself and is ignored. Children whose bit
/// cleared are closed and their pool slot freed. For bits that appeared, a
/// free pool slot is claimed, initialized, registered in the children
/// array, probed for VID/PID, and handed to the shim's setup collaborator
/// with its lifecycle lock still held.
///
/// At most one newly present child is brought up per invocation; the early
/// return is deliberate and callers pick up remaining children on a later
/// invocation (`Ok(Some(slot))` says a device was connected, so re-invoke).
///
/// The caller must not hold the dongle's lifecycle lock across this call.
pub fn update_dongle_subdevices(
    pool: &DevicePool,
    dongle: SlotId,
    presence: u8,
    shim: &dyn UsbShim,
) -> Result<Option<SlotId>> {
    let dongle_packet_size = pool.state(dongle).lock().out_packet_size;

    let mut children = pool.children(dongle).lock();

    // Disconnect sweep: bits that cleared while a child occupies the slot
    for child_id in 1..=MAX_SUBDEVICES as u8 {
        if (presence >> child_id) & 1 == 1 {
            continue;
        }
        let slot_index = usize::from(child_id) - 1;
        let Some(child) = children[slot_index] else {
            continue;
        };

        let mut state = pool.state(child).lock();
        info!("bragi subdevice {} (slot {}) disappeared", child_id, child.0);
        shim.close(&mut state);
        state.status = DeviceStatus::Disconnected;
        state.parent = None;
        state.child_id = None;
        children[slot_index] = None;
    }

    // Connect sweep: bits that appeared while the slot is empty
    for child_id in 1..=MAX_SUBDEVICES as u8 {
        if (presence >> child_id) & 1 == 0 {
            continue;
        }
        let slot_index = usize::from(child_id) - 1;
        if children[slot_index].is_some() {
            continue;
        }

        info!("found new bragi subdevice {}", child_id);

        let Some(mut claimed) = pool.claim_free() else {
            error!("no free device slots for subdevice {}", child_id);
            continue;
        };

        claimed.status = DeviceStatus::Connecting;
        claimed.firmware_version = FIRMWARE_UNSET;
        claimed.parent = Some(dongle);
        claimed.out_packet_size = dongle_packet_size;
        // Provisional table; setup picks the real one once VID/PID are known
        claimed.table = CommandTable::Mouse;
        claimed.child_id = Some(child_id);
        children[slot_index] = Some(claimed.id());

        // Must be released before any USB transaction so slow I/O on this
        // child cannot stall sibling connect/disconnect handling.
        drop(children);

        let probe = get_property(shim, &claimed, wire::property::VID).and_then(|vid| {
            get_property(shim, &claimed, wire::property::PID).map(|pid| (vid, pid))
        });
        let (vid, pid) = match probe {
            Ok(identity) => identity,
            Err(err) => {
                error!("failed to probe subdevice {}: {}", child_id, err);
                abort_bringup(pool, dongle, slot_index, claimed);
                return Err(err);
            }
        };
        claimed.vendor_id = vid;
        claimed.product_id = pid;
        info!("subdevice vendor {:#06x}, product {:#06x}", vid, pid);

        let id = claimed.id();
        // Lifecycle lock is handed off still held; setup completes
        // Connecting -> Connected and releases it.
        shim.setup(claimed);
        return Ok(Some(id));
    }

    Ok(None)
}

/// Undo a partial bring-up after a probe failure: free the slot and remove
/// it from the children array.
fn abort_bringup(pool: &DevicePool, dongle: SlotId, slot_index: usize, mut claimed: ClaimedSlot<'_>) {
    claimed.status = DeviceStatus::Disconnected;
    claimed.parent = None;
    claimed.child_id = None;
    // Release the lifecycle lock before re-taking the children-set lock to
    // keep the children -> lifecycle lock order used everywhere else.
    drop(claimed);
    pool.children(dongle).lock()[slot_index] = None;
}
