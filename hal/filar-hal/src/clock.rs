//! Monotonic time source

/// Monotonic millisecond clock
///
/// Stamps received bytes so callers can frame messages on inter-byte
/// silence. Wraps at `u32::MAX` milliseconds (about 49 days); callers
/// compare timestamps with wrapping arithmetic.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch
    fn now_millis(&self) -> u32;
}
