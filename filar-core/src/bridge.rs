//! Completion dispatch from interrupt context
//!
//! Hardware completion events carry only the [`PortId`] of the unit that
//! raised them. Channels register here when bound; the two entry points look
//! the owning channel up in a fixed-capacity registry and drive its transfer
//! chain. Both run in interrupt context and never block.
//!
//! A completion for an id that was never bound is a wiring defect: some ISR
//! is forwarding events for a unit no channel owns. That is fatal, not
//! recoverable.

use core::cell::RefCell;

use critical_section::Mutex;
use filar_hal::PortId;
use heapless::Vec;

/// Upper bound on simultaneously registered channels
pub const MAX_PORTS: usize = 4;

// Backing capacity for the completion registry. In production this is
// `MAX_PORTS`. The test binary shares one process-global registry across
// every test, each binding a distinct port id with no teardown, so the
// test build sizes the store to hold them all.
#[cfg(not(test))]
const REGISTRY_CAP: usize = MAX_PORTS;
#[cfg(test)]
const REGISTRY_CAP: usize = 64;

/// Completion hooks a channel exposes to the bridge
///
/// Implemented by [`Serial`](crate::Serial); object-safe so channels with
/// different transport types and queue capacities share one registry.
pub trait SerialEvents: Sync {
    /// One queued byte finished transmitting
    fn tx_complete(&self);

    /// One byte arrived in the transport's holding register
    fn rx_complete(&self);
}

static REGISTRY: Mutex<RefCell<Vec<(PortId, &'static dyn SerialEvents), REGISTRY_CAP>>> =
    Mutex::new(RefCell::new(Vec::new()));

/// Register a bound channel for completion dispatch
///
/// Called by `Serial::bind`. A duplicate id or a full registry is a wiring
/// defect and panics.
pub(crate) fn register(id: PortId, hook: &'static dyn SerialEvents) {
    critical_section::with(|cs| {
        let mut registry = REGISTRY.borrow_ref_mut(cs);
        if registry.iter().any(|(known, _)| *known == id) {
            panic!("serial: port already registered");
        }
        if registry.push((id, hook)).is_err() {
            panic!("serial: port registry full");
        }
    })
}

fn lookup(id: PortId) -> &'static dyn SerialEvents {
    let found = critical_section::with(|cs| {
        REGISTRY
            .borrow_ref(cs)
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, hook)| *hook)
    });
    match found {
        Some(hook) => hook,
        None => panic!("serial: completion for unregistered port"),
    }
}

/// Transmit-complete entry point, called from the ISR of unit `id`
///
/// The owning channel pops and starts its next queued byte, or goes idle.
pub fn on_transmit_complete(id: PortId) {
    lookup(id).tx_complete();
}

/// Receive-complete entry point, called from the ISR of unit `id`
///
/// The owning channel buffers the received byte, stamps its arrival time
/// and re-arms the next one-byte receive.
pub fn on_receive_complete(id: PortId) {
    lookup(id).rx_complete();
}
