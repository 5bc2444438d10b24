//! # tmc2209-uart
//!
//! Half-duplex UART register access and logical parameter dispatch for TMC2209
//! stepper drivers, with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Shared CRC-8**: Table-driven checksum identical to the driver's
//! - **Bounded exchanges**: Every read waits at most the configured timeout
//! - **Register mirror**: Write-only registers read back from a local shadow copy
//! - **Typed parameters**: Closed `LogicalParameter` set instead of raw codes
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tmc2209_uart::{Channel, RegisterEngine, SystemConfig, Tmc2209Board};
//!
//! // Load configuration from TOML
//! let config: SystemConfig = tmc2209_uart::load_config("board.toml")?;
//! let channel = config.require_channel("ch2")?;
//!
//! // Register engine on top of the UART peripheral
//! let registers = RegisterEngine::from_config(uart, clock, delay, channel);
//!
//! let mut board = Tmc2209Board::builder()
//!     .from_channel_config(channel)
//!     .registers(registers)
//!     .generator(step_dir)
//!     .pins(pins)
//!     .pwm(uc_pwm)
//!     .build(&config)?;
//!
//! // Host parameter 4: maximum velocity
//! board.set_parameter(4, 0, 100_000)?;
//! board.move_by(0, 3200)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and `StdClock`
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Core modules
pub mod board;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod register;
pub mod transport;

// Re-exports for ergonomic API
pub use board::{Channel, DriverState, ErrorFlags, HealthMonitor, IoState, Tmc2209Board};
pub use config::{validate_config, ChannelConfig, SystemConfig};
pub use dispatch::{LogicalParameter, MotionGenerator, ParameterDispatch};
pub use error::{Error, Result};
pub use protocol::{Crc8, FrameCodec, RegisterAddress};
pub use register::{RegisterEngine, RegisterSpace};
pub use transport::{Clock, ExchangeResult, UartBus, UartTransport};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_channel_config, parse_config};
