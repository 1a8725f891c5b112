//! Application core: pure domain logic, zero I/O.
//!
//! Business rules for the remote station: the monotonic clock, the
//! countdown timer and the command processor that ties a set-valve
//! command to valve actuation and timed closure.  All interaction with
//! hardware happens through **port traits** defined in [`ports`].

pub mod clock;
pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod timer;
