//! Writer adapters for the transmit side
//!
//! [`Writer`] borrows a channel and implements [`core::fmt::Write`] for
//! `write!`-style formatting plus the `embedded-io` write traits for generic
//! consumers. Writes never block: the accepted prefix is queued and
//! reported, and a completely full queue is an error, not a wait.
//!
//! `embedded_io::Read` is deliberately not implemented. Its contract
//! reserves `Ok(0)` for end-of-stream, which a never-blocking, never-ending
//! serial link cannot honor; readers use [`Serial::read`] and
//! [`Serial::read_until`] directly.

use core::fmt;

use embedded_io::{ErrorKind, ErrorType, Write, WriteReady};
use filar_hal::{Clock, Transport};

use crate::channel::Serial;
use crate::queue::Overrun;

impl embedded_io::Error for Overrun {
    fn kind(&self) -> ErrorKind {
        ErrorKind::OutOfMemory
    }
}

/// Borrowed handle to a channel's transmit queue
pub struct Writer<'a, T, C, const TX: usize, const RX: usize> {
    serial: &'a Serial<T, C, TX, RX>,
}

impl<'a, T, C, const TX: usize, const RX: usize> Writer<'a, T, C, TX, RX> {
    pub(crate) fn new(serial: &'a Serial<T, C, TX, RX>) -> Self {
        Self { serial }
    }
}

impl<T, C, const TX: usize, const RX: usize> fmt::Write for Writer<'_, T, C, TX, RX>
where
    T: Transport,
    C: Clock,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.serial.write(s.as_bytes()) < s.len() {
            return Err(fmt::Error);
        }
        Ok(())
    }
}

impl<T, C, const TX: usize, const RX: usize> ErrorType for Writer<'_, T, C, TX, RX> {
    type Error = Overrun;
}

impl<T, C, const TX: usize, const RX: usize> Write for Writer<'_, T, C, TX, RX>
where
    T: Transport,
    C: Clock,
{
    /// Queue as much of `buf` as fits, reporting the accepted prefix
    ///
    /// A queue with no room at all yields [`Overrun`] immediately rather
    /// than waiting for the interrupt chain to make space.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Overrun> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.serial.write(buf) {
            0 => Err(Overrun),
            n => Ok(n),
        }
    }

    /// Nothing to wait on: queued bytes drain from interrupt context
    fn flush(&mut self) -> Result<(), Overrun> {
        Ok(())
    }
}

impl<T, C, const TX: usize, const RX: usize> WriteReady for Writer<'_, T, C, TX, RX>
where
    T: Transport,
    C: Clock,
{
    fn write_ready(&mut self) -> Result<bool, Overrun> {
        Ok(self.serial.tx_space() > 0)
    }
}
