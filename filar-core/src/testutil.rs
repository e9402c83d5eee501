//! Mock hardware shared by the channel, bridge and io tests
//!
//! [`MockPort`] records every start call into a test-visible log guarded by
//! the same critical sections the channels use; nothing completes on its
//! own, so tests pump the bridge entry points to simulate the interrupt
//! side. [`TestClock`] is advanced by hand.

use core::cell::{Cell, RefCell};

use critical_section::Mutex;
use filar_hal::{Clock, PortId, StartError, Transport};

/// Record of everything a [`MockPort`] was asked to do
pub struct PortLog {
    /// Bytes handed to `start_transmit`, oldest first
    pub transmitted: heapless::Vec<u8, 128>,
    /// Number of one-byte receives armed so far
    pub receives_armed: usize,
    /// Byte the next receive-complete reports
    pub next_rx: u8,
    /// Fail the next start call with [`StartError::Fault`]
    pub fail_next_start: bool,
}

impl PortLog {
    pub const fn new() -> Self {
        Self {
            transmitted: heapless::Vec::new(),
            receives_armed: 0,
            next_rx: 0,
            fail_next_start: false,
        }
    }
}

pub type SharedLog = Mutex<RefCell<PortLog>>;
pub type SharedClock = Mutex<Cell<u32>>;

/// Fresh log for a test-local `static`
pub const fn shared_log() -> SharedLog {
    Mutex::new(RefCell::new(PortLog::new()))
}

pub fn with_log<R>(log: &SharedLog, f: impl FnOnce(&mut PortLog) -> R) -> R {
    critical_section::with(|cs| f(&mut log.borrow_ref_mut(cs)))
}

/// Everything `start_transmit` has been handed, oldest first
pub fn transmitted(log: &SharedLog) -> heapless::Vec<u8, 128> {
    with_log(log, |l| l.transmitted.clone())
}

pub fn receives_armed(log: &SharedLog) -> usize {
    with_log(log, |l| l.receives_armed)
}

/// Stage the byte the next receive-complete will deliver
pub fn feed_rx(log: &SharedLog, byte: u8) {
    with_log(log, |l| l.next_rx = byte);
}

/// Make the next start call report a hardware fault
pub fn fail_next_start(log: &SharedLog) {
    with_log(log, |l| l.fail_next_start = true);
}

/// Transport double: records starts, completes nothing on its own
pub struct MockPort {
    id: PortId,
    log: &'static SharedLog,
}

impl MockPort {
    pub const fn new(id: PortId, log: &'static SharedLog) -> Self {
        Self { id, log }
    }
}

impl Transport for MockPort {
    fn id(&self) -> PortId {
        self.id
    }

    fn start_transmit(&mut self, byte: u8) -> Result<(), StartError> {
        with_log(self.log, |l| {
            if l.fail_next_start {
                l.fail_next_start = false;
                return Err(StartError::Fault);
            }
            l.transmitted.push(byte).expect("mock transmit log full");
            Ok(())
        })
    }

    fn start_receive(&mut self) -> Result<(), StartError> {
        with_log(self.log, |l| {
            if l.fail_next_start {
                l.fail_next_start = false;
                return Err(StartError::Fault);
            }
            l.receives_armed += 1;
            Ok(())
        })
    }

    fn received_byte(&mut self) -> u8 {
        with_log(self.log, |l| l.next_rx)
    }
}

/// Manually advanced millisecond clock
pub struct TestClock {
    now: &'static SharedClock,
}

impl TestClock {
    pub const fn new(now: &'static SharedClock) -> Self {
        Self { now }
    }

    /// Fresh time cell for a test-local `static`
    pub const fn shared() -> SharedClock {
        Mutex::new(Cell::new(0))
    }
}

impl Clock for TestClock {
    fn now_millis(&self) -> u32 {
        critical_section::with(|cs| self.now.borrow(cs).get())
    }
}

/// Advance the mock clock
pub fn set_now(now: &SharedClock, ms: u32) {
    critical_section::with(|cs| now.borrow(cs).set(ms));
}
