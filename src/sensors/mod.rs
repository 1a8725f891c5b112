//! Sensor drivers.

pub mod water_level;
