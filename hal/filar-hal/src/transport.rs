//! Serial transport abstraction
//!
//! One [`Transport`] wraps one physical UART unit. All transfers are a
//! single byte; a started transfer completes later, when the chip's
//! interrupt handler reports the matching completion event tagged with the
//! unit's [`PortId`]. The core chains transfers off those completions.

/// Identity of one physical serial unit
///
/// Completion events carry the `PortId` of the unit that raised them, and
/// the interrupt bridge routes them to the owning channel by comparing ids.
/// A natural choice on most chips is the peripheral's base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortId(pub usize);

/// Non-OK outcome of starting a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartError {
    /// The unit already has a transfer outstanding
    Busy,
    /// The unit reported a hardware fault
    Fault,
}

/// One physical serial unit capable of asynchronous single-byte transfers
///
/// Implementations must return from the `start_*` methods immediately and
/// report completion asynchronously, from interrupt context, never from
/// inside the call itself. The core starts at most one transmit and one
/// receive per unit at a time.
pub trait Transport {
    /// Identity used to route completion events back to this unit
    fn id(&self) -> PortId;

    /// Begin transmitting one byte
    ///
    /// Completion is reported via the unit's transmit-complete event.
    fn start_transmit(&mut self, byte: u8) -> Result<(), StartError>;

    /// Arm a one-byte receive into the unit's holding register
    ///
    /// Completion is reported via the unit's receive-complete event.
    fn start_receive(&mut self) -> Result<(), StartError>;

    /// The byte captured by the most recently completed receive
    ///
    /// Only meaningful between a receive-complete event and the next
    /// [`start_receive`](Transport::start_receive).
    fn received_byte(&mut self) -> u8;
}
