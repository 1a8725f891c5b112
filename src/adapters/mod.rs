//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements   | Connects to                 |
//! |-------------|--------------|-----------------------------|
//! | `log_sink`  | EventSink    | Serial log output           |
//! | `pushover`  | EventSink    | Pushover.net messages API   |
//! | `nvs`       | ConfigPort   | NVS / in-memory store       |
//! | `time`      | MillisSource | ESP32 high-resolution timer |
//! | `http`      | (inbound)    | ESP-IDF HTTP server         |
//! | `wifi`      | (bring-up)   | ESP-IDF WiFi STA            |

#[cfg(target_os = "espidf")]
pub mod http;
pub mod log_sink;
pub mod nvs;
pub mod pushover;
pub mod time;
pub mod wifi;
