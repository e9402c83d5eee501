//! Interrupt-driven buffered serial channels
//!
//! Application code enqueues and dequeues bytes synchronously on a
//! [`Serial`] channel; the hardware moves one byte at a time asynchronously
//! and reports each completion through the [`bridge`], which chains the next
//! transfer. Nothing in this crate ever blocks: writes return the accepted
//! byte count immediately and reads return short when the buffer runs dry.
//!
//! Channel state is shared between mainline and interrupt context behind
//! brief critical sections, and each queue has exactly one producer and one
//! consumer context per direction:
//!
//! - transmit queue: mainline produces, interrupt context consumes
//! - receive queue: interrupt context produces, mainline consumes
//!
//! Completion events carry only a [`PortId`]; the bridge demultiplexes them
//! to the owning channel through a registry built at bind time.

#![no_std]
#![deny(unsafe_code)]

// Host tests run against std (mock hardware, proptest)
#[cfg(test)]
extern crate std;

pub mod bridge;
pub mod channel;
pub mod io;
pub mod queue;

// Re-export the key types at crate root for convenience
pub use channel::Serial;
pub use io::Writer;
pub use queue::{ByteQueue, Overrun};

pub use filar_hal::{Clock, PortId, StartError, Transport};

#[cfg(test)]
pub(crate) mod testutil;
