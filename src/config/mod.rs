//! Configuration module for tmc2209-uart.
//!
//! Provides types for loading and validating channel configurations from TOML
//! files (with `std` feature) or pre-parsed data.

mod channel;
mod system;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use channel::ChannelConfig;
pub use system::SystemConfig;
pub use validation::{validate_channel, validate_config};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_channel_config, parse_config};
