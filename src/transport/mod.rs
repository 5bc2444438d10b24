//! Transport module for tmc2209-uart.
//!
//! Provides the blocking half-duplex exchange and the peripheral traits it is built on.

mod bus;
mod exchange;

#[cfg(feature = "std")]
pub use bus::StdClock;
pub use bus::{Clock, UartBus};
pub use exchange::{
    ExchangeResult, UartTransport, DEFAULT_SETTLE_MS, DEFAULT_TIMEOUT_MS, MAX_EXCHANGE_LEN,
};
