//! Tick durations and timeout sentinels
//!
//! Every blocking operation in this crate takes its deadline as a tick
//! count. The host port maps ticks onto the OS monotonic clock at
//! [`TICK_RATE_HZ`]; scheduler ports map them onto their own tick
//! interrupt.

use std::time::Duration;

/// A duration expressed in scheduler ticks.
pub type Ticks = u32;

/// Tick frequency of the host port.
pub const TICK_RATE_HZ: u32 = 1_000;

/// The tick value that means "block forever".
///
/// Passing this to a timed acquire suspends the caller indefinitely.
pub const fn max_delay() -> Ticks {
    Ticks::MAX
}

/// Convert a millisecond count to ticks at [`TICK_RATE_HZ`].
pub const fn from_millis(ms: u32) -> Ticks {
    (ms as u64 * TICK_RATE_HZ as u64 / 1_000) as Ticks
}

/// Wall-clock equivalent of a finite tick count on the host port.
pub(crate) fn duration_from_ticks(timeout: Ticks) -> Duration {
    Duration::from_micros(timeout as u64 * 1_000_000 / TICK_RATE_HZ as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_delay_is_sentinel() {
        assert_eq!(max_delay(), Ticks::MAX);
    }

    #[test]
    fn test_from_millis_at_host_rate() {
        // 1 kHz host rate: one tick per millisecond
        assert_eq!(from_millis(0), 0);
        assert_eq!(from_millis(50), 50);
        assert_eq!(from_millis(1_000), 1_000);
    }

    #[test]
    fn test_duration_from_ticks() {
        assert_eq!(duration_from_ticks(0), Duration::ZERO);
        assert_eq!(duration_from_ticks(250), Duration::from_millis(250));
    }
}
