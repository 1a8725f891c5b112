//! Countdown timer for automatic valve closure.
//!
//! Holds an optional expiry in elapsed seconds of the station
//! [`Clock`](super::clock::Clock).  All methods take the current clock
//! reading explicitly so the timer stays a plain value with no hidden
//! dependency on global time.

use log::info;

use super::clock::seconds_reached;

/// Arm request exceeded the timer's own duration cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmRejected {
    pub requested: u32,
    pub max: u32,
}

impl core::fmt::Display for ArmRejected {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "duration {}s exceeds timer cap {}s", self.requested, self.max)
    }
}

#[derive(Debug, Clone)]
pub struct CountdownTimer {
    max_duration_secs: u32,
    /// `Some(expiry)` while armed.
    expiry: Option<u32>,
}

impl CountdownTimer {
    /// Create a disarmed timer that refuses durations above `max_duration_secs`.
    pub fn new(max_duration_secs: u32) -> Self {
        Self {
            max_duration_secs,
            expiry: None,
        }
    }

    /// Arm for `duration` seconds from `now`, replacing any pending expiry.
    ///
    /// An over-long duration leaves the timer exactly as it was.  A zero
    /// duration is legal and triggers on the next check.
    pub fn set(&mut self, duration: u32, now: u32) -> Result<(), ArmRejected> {
        if duration > self.max_duration_secs {
            return Err(ArmRejected {
                requested: duration,
                max: self.max_duration_secs,
            });
        }
        self.expiry = Some(now.wrapping_add(duration));
        info!("Timer set for {} seconds", duration);
        Ok(())
    }

    /// Disarm.  Idempotent.
    pub fn clear(&mut self) {
        if self.expiry.take().is_some() {
            info!("Timer cleared");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.expiry.is_some()
    }

    /// Armed and the expiry has been reached.
    pub fn is_triggered(&self, now: u32) -> bool {
        self.expiry.is_some_and(|expiry| seconds_reached(now, expiry))
    }

    /// Seconds left before expiry.
    ///
    /// `None` when disarmed; `Some(0)` once expired but not yet cleared.
    pub fn remaining(&self, now: u32) -> Option<u32> {
        self.expiry.map(|expiry| {
            if seconds_reached(now, expiry) {
                0
            } else {
                expiry.wrapping_sub(now)
            }
        })
    }

    /// Shift a pending expiry by `delta` seconds after the clock it is
    /// measured against jumped forward by the same amount.  Remaining time
    /// is unchanged.  No-op when disarmed.
    pub fn rebase(&mut self, delta: u32) {
        if let Some(expiry) = self.expiry.as_mut() {
            *expiry = expiry.wrapping_add(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arms_and_counts_down() {
        let mut t = CountdownTimer::new(3600);
        assert!(!t.is_armed());
        assert_eq!(t.remaining(0), None);

        t.set(120, 1_000).unwrap();
        assert!(t.is_armed());
        assert_eq!(t.remaining(1_000), Some(120));
        assert_eq!(t.remaining(1_100), Some(20));
        assert!(!t.is_triggered(1_119));
        assert!(t.is_triggered(1_120));
        assert_eq!(t.remaining(1_125), Some(0));
    }

    #[test]
    fn over_cap_is_rejected_without_touching_state() {
        let mut t = CountdownTimer::new(3600);
        let err = t.set(3601, 0).unwrap_err();
        assert_eq!(err, ArmRejected { requested: 3601, max: 3600 });
        assert!(!t.is_armed());

        t.set(60, 0).unwrap();
        assert!(t.set(10_000, 5).is_err());
        assert_eq!(t.remaining(5), Some(55), "previous expiry must survive");
    }

    #[test]
    fn rearm_replaces_expiry() {
        let mut t = CountdownTimer::new(3600);
        t.set(600, 0).unwrap();
        t.set(30, 10).unwrap();
        assert_eq!(t.remaining(10), Some(30));
    }

    #[test]
    fn zero_duration_triggers_immediately() {
        let mut t = CountdownTimer::new(3600);
        t.set(0, 42).unwrap();
        assert!(t.is_armed());
        assert!(t.is_triggered(42));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut t = CountdownTimer::new(3600);
        t.clear();
        t.set(5, 0).unwrap();
        t.clear();
        t.clear();
        assert!(!t.is_armed());
        assert!(!t.is_triggered(1_000));
    }

    #[test]
    fn rebase_keeps_remaining_after_clock_jump() {
        let mut t = CountdownTimer::new(3600);
        t.rebase(1_000);
        assert!(!t.is_armed());

        t.set(600, 5).unwrap();
        t.rebase(1_760_000_000);
        let now = 1_760_000_005;
        assert!(!t.is_triggered(now));
        assert_eq!(t.remaining(now), Some(600));
        assert!(t.is_triggered(now + 600));
    }

    #[test]
    fn expiry_across_seconds_wrap() {
        let mut t = CountdownTimer::new(3600);
        let start = u32::MAX - 10;
        t.set(60, start).unwrap();
        assert!(!t.is_triggered(start.wrapping_add(59)));
        assert_eq!(t.remaining(start.wrapping_add(20)), Some(40));
        assert!(t.is_triggered(start.wrapping_add(60)));
    }
}
