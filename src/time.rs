//! Time abstraction for platform-agnostic timing.
//!
//! All cadences in the crate are wall-clock gated: a subsystem remembers the
//! instant of its last action and compares the elapsed time against a fixed
//! interval on every tick. Instants are microsecond timer ticks since boot,
//! which is what most MCU timers (and the echo measurement) run at.

use fugit::{MicrosDurationU64, TimerInstantU64};

/// Microsecond-resolution instant since boot.
pub type Instant = TimerInstantU64<1_000_000>;

/// Duration matching [`Instant`].
pub type Duration = MicrosDurationU64;

/// The boot instant. Cadence timers start here.
pub const BOOT: Instant = Instant::from_ticks(0);

/// Trait for abstracting time sources.
pub trait TimeSource {
    /// Returns the current time instant.
    fn now(&self) -> Instant;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Time from `earlier` to `now`, or zero if `earlier` is in the future.
#[inline]
pub fn elapsed(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier)
        .unwrap_or(Duration::from_ticks(0))
}

/// Whole milliseconds since boot.
#[inline]
pub fn millis(instant: Instant) -> u64 {
    instant.duration_since_epoch().to_millis()
}

/// Returns true once strictly more than `interval_ms` has passed since `since`.
#[inline]
pub fn interval_passed(now: Instant, since: Instant, interval_ms: u64) -> bool {
    elapsed(now, since).to_millis() > interval_ms
}
