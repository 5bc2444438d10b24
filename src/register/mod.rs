//! Register module for tmc2209-uart.
//!
//! Provides address-indexed 32-bit register access to one device and the
//! shadow copy of its register space.

mod engine;
mod shadow;

pub use engine::{RegisterEngine, UNKNOWN_VALUE};
pub use shadow::{ConfigState, RegisterFile};

use crate::error::BusError;
use crate::protocol::RegisterAddress;

/// Register-level access to one device.
///
/// Implemented by [`RegisterEngine`]; the board and parameter dispatch only
/// depend on this trait.
pub trait RegisterSpace {
    /// Write `value` to `address`. No reply is expected.
    fn write_register(&mut self, address: RegisterAddress, value: i32);

    /// Read `address`.
    ///
    /// A timed-out or damaged reply yields [`UNKNOWN_VALUE`]; callers that poll
    /// periodically keep their previous value. The fault is retained for
    /// [`RegisterSpace::take_fault`].
    fn read_register(&mut self, address: RegisterAddress) -> i32;

    /// Bus address of the device.
    fn slave_address(&self) -> u8;

    /// Change the bus address used for subsequent frames.
    fn set_slave_address(&mut self, address: u8);

    /// Start pushing power-on register values. `false` if a push is running.
    fn reset(&mut self) -> bool;

    /// Start pushing the shadow register values. `false` if a push is running.
    fn restore(&mut self) -> bool;

    /// Advance a running configuration push by one register.
    fn periodic_job(&mut self, tick: u32);

    /// Take the fault of the last failed lenient read, if any.
    fn take_fault(&mut self) -> Option<BusError>;
}
