//! Monotonic seconds clock over a wrapping millisecond counter.
//!
//! The hardware counter is a free-running `u32` of milliseconds which
//! wraps roughly every 49.7 days.  [`Clock`] folds it into whole elapsed
//! seconds using only wrapping differences, so a counter overflow between
//! two polls is indistinguishable from any other 1000 ms step.
//!
//! Elapsed seconds are themselves a `u32` and may wrap over very long
//! uptimes (or after seeding near `u32::MAX`).  Anything comparing two
//! second values must use [`seconds_reached`] rather than `>=`.

use log::{debug, warn};

use super::ports::MillisSource;

const MILLIS_PER_SEC: u32 = 1000;

/// Wrap-safe "has `now` reached `target`" for elapsed-second values.
///
/// Treats the two values as points on a circle and orders them by the
/// shorter arc, which is correct as long as they are less than 2^31
/// seconds apart.
pub fn seconds_reached(now: u32, target: u32) -> bool {
    (now.wrapping_sub(target) as i32) >= 0
}

/// Seconds clock owned by the station service.
pub struct Clock<S> {
    source: S,
    /// Seconds value at the last seed (0 at boot).
    origin: u32,
    /// Whole seconds counted since the last seed.
    elapsed: u32,
    /// Counter reading corresponding to the start of the current second.
    last_tick_millis: u32,
}

impl<S: MillisSource> Clock<S> {
    pub fn new(source: S) -> Self {
        let last_tick_millis = source.millis();
        Self {
            source,
            origin: 0,
            elapsed: 0,
            last_tick_millis,
        }
    }

    /// Current time in seconds.  Never moves backward.
    pub fn now(&mut self) -> u32 {
        let delta = self.source.millis().wrapping_sub(self.last_tick_millis);
        let whole = delta / MILLIS_PER_SEC;
        if whole > 0 {
            self.elapsed = self.elapsed.wrapping_add(whole);
            self.last_tick_millis = self
                .last_tick_millis
                .wrapping_add(whole * MILLIS_PER_SEC);
        }
        self.origin.wrapping_add(self.elapsed)
    }

    /// Re-seed the clock, e.g. after a network time sync.
    ///
    /// A seed behind the current reading is clamped to the current reading
    /// so the sequence of `now()` values stays monotonic.  Seeds are
    /// absolute values and are ordered with a plain `>=`, not the circular
    /// [`seconds_reached`], so any seed numerically ahead is taken however
    /// far ahead it is.  Returns the value the clock now reads.
    pub fn set(&mut self, seconds: u32) -> u32 {
        let current = self.now();
        let seed = if seconds >= current {
            seconds
        } else {
            warn!(
                "Clock: backward seed {} < {} ignored, holding current time",
                seconds, current
            );
            current
        };
        self.origin = seed;
        self.elapsed = 0;
        self.last_tick_millis = self.source.millis();
        debug!("Clock: seeded at {}s", seed);
        seed
    }
}
