//! Board module for tmc2209-uart.
//!
//! The channel surface an external command router drives: motion commands,
//! register and parameter access, diagnostic pins, driver enable and health.

mod channel;
mod health;
mod pins;
mod tmc2209;

pub use channel::{Channel, DriverState};
pub use health::{ErrorFlags, HealthMonitor};
pub use pins::{BoardPins, IoState, PinSelect, TrackedPin};
pub use tmc2209::{Tmc2209Board, Tmc2209BoardBuilder};
