//! Buffered duplex serial channel
//!
//! A [`Serial`] binds one [`Transport`] to a transmit queue and a receive
//! queue. Mainline code writes and reads through this type; the interrupt
//! [`bridge`](crate::bridge) drives the per-byte transfer chains on hardware
//! completions.
//!
//! Transmit is a chain: `write` queues the message and, only if no transfer
//! is outstanding, starts the first byte. Each transmit-complete event pops
//! and starts the next byte until the queue runs dry. Receive is symmetric
//! with the roles swapped: once armed by [`Serial::enable_receive`], every
//! completed byte is buffered, stamped and immediately re-armed, so exactly
//! one hardware receive is in flight from then on.
//!
//! Every state access, from either execution context, runs inside one
//! critical section. In particular the idle-check-then-start in `write` is
//! atomic, so mainline and interrupt context can never both observe an idle
//! transmitter and both start a transfer.

use core::cell::RefCell;

use critical_section::Mutex;
use filar_hal::{Clock, Transport};

use crate::bridge::{self, SerialEvents};
use crate::io::Writer;
use crate::queue::ByteQueue;

/// One buffered serial channel
///
/// `TX` and `RX` are the queue capacities in bytes. Channels are meant to
/// live in `static`s and be bound to their hardware once at startup:
///
/// ```ignore
/// static CONSOLE: Serial<Usart1, SysTick, 64, 64> = Serial::new();
///
/// fn init(usart1: Usart1) {
///     CONSOLE.bind(usart1, SysTick);
///     CONSOLE.enable_receive();
///     CONSOLE.println("ready");
/// }
/// ```
///
/// The matching ISR glue forwards the chip's completion interrupts to
/// [`bridge::on_transmit_complete`] and [`bridge::on_receive_complete`].
pub struct Serial<T, C, const TX: usize, const RX: usize> {
    state: Mutex<RefCell<State<T, C, TX, RX>>>,
}

/// Hardware bound to a channel by [`Serial::bind`]
struct Link<T, C> {
    transport: T,
    clock: C,
}

struct State<T, C, const TX: usize, const RX: usize> {
    link: Option<Link<T, C>>,
    tx: ByteQueue<TX>,
    rx: ByteQueue<RX>,
    /// True iff exactly one transmit is outstanding
    tx_active: bool,
    /// True once the receive chain is armed; never cleared
    rx_active: bool,
    last_rx_ms: u32,
    rx_overruns: u32,
}

impl<T, C, const TX: usize, const RX: usize> Serial<T, C, TX, RX> {
    /// Create an unbound channel with empty queues
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(State {
                link: None,
                tx: ByteQueue::new(),
                rx: ByteQueue::new(),
                tx_active: false,
                rx_active: false,
                last_rx_ms: 0,
                rx_overruns: 0,
            })),
        }
    }
}

impl<T, C, const TX: usize, const RX: usize> Default for Serial<T, C, TX, RX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, const TX: usize, const RX: usize> Serial<T, C, TX, RX>
where
    T: Transport,
    C: Clock,
{
    fn with<R>(&self, f: impl FnOnce(&mut State<T, C, TX, RX>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow_ref_mut(cs)))
    }

    /// Bind hardware to this channel and register it for completion dispatch
    ///
    /// Must be called exactly once per channel, before any other operation.
    /// Binding an already-bound channel, or a transport whose [`PortId`] is
    /// already registered, is a wiring defect and panics.
    ///
    /// [`PortId`]: filar_hal::PortId
    pub fn bind(&'static self, transport: T, clock: C)
    where
        T: Send,
        C: Send,
    {
        let id = transport.id();
        self.with(|state| {
            if state.link.is_some() {
                panic!("serial: channel already bound");
            }
            state.link = Some(Link { transport, clock });
        });
        bridge::register(id, self);
    }

    /// Queue bytes for transmission, starting the hardware chain if idle
    ///
    /// Returns the number of bytes accepted. When the transmit queue fills,
    /// the remaining bytes are rejected rather than overwriting queued data.
    /// Never blocks; the queued bytes drain from interrupt context.
    pub fn write(&self, data: &[u8]) -> usize {
        self.with(|state| {
            let mut accepted = 0;
            for &byte in data {
                if state.tx.push(byte).is_err() {
                    break;
                }
                accepted += 1;
            }
            state.kick_tx();
            accepted
        })
    }

    /// Queue a string for transmission
    ///
    /// Returns the number of bytes accepted.
    pub fn print(&self, s: &str) -> usize {
        self.write(s.as_bytes())
    }

    /// Queue a string followed by a line feed
    ///
    /// Returns the number of bytes accepted, terminator included.
    pub fn println(&self, s: &str) -> usize {
        self.print(s) + self.write(b"\n")
    }

    /// Arm the receive chain
    ///
    /// The first call starts a one-byte hardware receive; every completed
    /// byte re-arms the next one, so the chain never stops once started.
    /// Calling again while armed is a no-op.
    pub fn enable_receive(&self) {
        self.with(|state| {
            if state.rx_active {
                return;
            }
            if state.link_mut().transport.start_receive().is_err() {
                panic!("serial: receive start rejected");
            }
            state.rx_active = true;
        })
    }

    /// Move buffered received bytes into `dest`
    ///
    /// Stops as soon as the receive queue is empty; the return value is the
    /// number of bytes moved, which may be shorter than `dest`. Never
    /// blocks.
    pub fn read(&self, dest: &mut [u8]) -> usize {
        self.with(|state| {
            let mut n = 0;
            while n < dest.len() {
                match state.rx.pop() {
                    Some(byte) => {
                        dest[n] = byte;
                        n += 1;
                    }
                    None => break,
                }
            }
            n
        })
    }

    /// Like [`Serial::read`], but stops at `terminator`
    ///
    /// The terminator is consumed and replaced with a NUL sentinel at its
    /// destination position; it is not counted in the returned length. Also
    /// stops when `dest` or the receive queue is exhausted, whichever comes
    /// first, leaving any unconsumed terminator in the queue.
    pub fn read_until(&self, dest: &mut [u8], terminator: u8) -> usize {
        self.with(|state| {
            let mut n = 0;
            while n < dest.len() {
                let Some(byte) = state.rx.pop() else { break };
                if byte == terminator {
                    dest[n] = 0x00;
                    break;
                }
                dest[n] = byte;
                n += 1;
            }
            n
        })
    }

    /// Number of received bytes waiting to be read
    pub fn is_data(&self) -> usize {
        self.with(|state| state.rx.len())
    }

    /// Discard all buffered received bytes
    ///
    /// Leaves the receive chain armed.
    pub fn flush(&self) {
        self.with(|state| state.rx.clear())
    }

    /// Timestamp of the most recently received byte, in clock milliseconds
    ///
    /// Callers frame messages on inter-byte silence by comparing this
    /// against the current time.
    pub fn last_receive_time(&self) -> u32 {
        self.with(|state| state.last_rx_ms)
    }

    /// Received bytes dropped because the receive queue was full
    pub fn rx_overruns(&self) -> u32 {
        self.with(|state| state.rx_overruns)
    }

    /// Free space in the transmit queue, in bytes
    pub fn tx_space(&self) -> usize {
        self.with(|state| state.tx.capacity() - state.tx.len())
    }

    /// Writer adapter for `write!` formatting and `embedded-io` consumers
    pub fn writer(&self) -> Writer<'_, T, C, TX, RX> {
        Writer::new(self)
    }
}

impl<T, C, const TX: usize, const RX: usize> State<T, C, TX, RX>
where
    T: Transport,
    C: Clock,
{
    fn link_mut(&mut self) -> &mut Link<T, C> {
        match self.link.as_mut() {
            Some(link) => link,
            // Completion or driver call on a channel that was never bound
            None => panic!("serial: channel not bound"),
        }
    }

    /// Start the transmit chain unless it is already running
    fn kick_tx(&mut self) {
        if self.tx_active {
            return;
        }
        let Some(byte) = self.tx.pop() else { return };
        if self.link_mut().transport.start_transmit(byte).is_err() {
            panic!("serial: transmit start rejected");
        }
        self.tx_active = true;
    }

    /// One byte went out; chain the next or go idle
    fn handle_tx_complete(&mut self) {
        match self.tx.pop() {
            Some(byte) => {
                if self.link_mut().transport.start_transmit(byte).is_err() {
                    panic!("serial: transmit start rejected");
                }
            }
            None => self.tx_active = false,
        }
    }

    /// One byte arrived; buffer it, stamp it, re-arm the next receive
    fn handle_rx_complete(&mut self) {
        let link = self.link_mut();
        let byte = link.transport.received_byte();
        let now = link.clock.now_millis();

        if self.rx.push(byte).is_err() {
            // Full queue drops the newest byte; never fatal
            self.rx_overruns = self.rx_overruns.wrapping_add(1);
        }
        self.last_rx_ms = now;

        // A gap here would silently lose the next incoming byte
        if self.link_mut().transport.start_receive().is_err() {
            panic!("serial: receive re-arm rejected");
        }
    }
}

impl<T, C, const TX: usize, const RX: usize> SerialEvents for Serial<T, C, TX, RX>
where
    T: Transport + Send,
    C: Clock + Send,
{
    fn tx_complete(&self) {
        self.with(|state| state.handle_tx_complete())
    }

    fn rx_complete(&self) {
        self.with(|state| state.handle_rx_complete())
    }
}
