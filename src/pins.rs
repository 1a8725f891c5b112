//! GPIO pin assignments for the remote-station board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Latching valve (H-bridge motor shield, channel A)
// ---------------------------------------------------------------------------

/// Digital output: direction.  HIGH = open, LOW = close.
pub const VALVE_CONTROL_GPIO: i32 = 4;
/// Digital output: bridge enable.  Pulsed HIGH to move the valve.
pub const VALVE_ENABLE_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Reservoir float switch
// ---------------------------------------------------------------------------

/// Digital input with pull-up.  LOW = water below the float.
pub const WATER_LEVEL_GPIO: i32 = 6;
