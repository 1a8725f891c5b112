//! Millisecond counter adapter.
//!
//! Implements [`MillisSource`] for the station clock.
//!
//! - **`target_os = "espidf"`**: `esp_timer_get_time()` (microseconds since
//!   boot) divided down and truncated to `u32`, so the counter wraps every
//!   ~49.7 days like a classic Arduino `millis()`.
//! - **`not(target_os = "espidf")`**: `std::time::Instant` for host-side
//!   runs, truncated the same way.

use crate::app::ports::MillisSource;

pub struct SystemMillis {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemMillis {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemMillis {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl MillisSource for SystemMillis {
    #[cfg(target_os = "espidf")]
    fn millis(&self) -> u32 {
        // SAFETY: reads the monotonic high-resolution timer; no preconditions.
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        (us / 1_000) as u32
    }

    #[cfg(not(target_os = "espidf"))]
    fn millis(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}
