//! Actuator drivers and hardware initialisation.

#[cfg(target_os = "espidf")]
pub mod hw_init;
#[cfg(not(target_os = "espidf"))]
pub mod sim;
pub mod valve;
