//! Operations an external command router invokes on a driver channel.

use crate::config::SystemConfig;
use crate::error::Result;
use crate::protocol::RegisterAddress;

use super::health::ErrorFlags;

/// Requested driver enable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Disable the driver outputs.
    Disabled,
    /// Enable the driver outputs, if the global enable allows it.
    Enabled,
    /// Follow the global enable.
    FollowGlobal,
}

impl DriverState {
    /// Resolve [`DriverState::FollowGlobal`] against the global enable.
    pub fn resolve(self, system: &SystemConfig) -> DriverState {
        match self {
            DriverState::FollowGlobal if system.driver_enable => DriverState::Enabled,
            DriverState::FollowGlobal => DriverState::Disabled,
            state => state,
        }
    }
}

/// A motor driver channel.
///
/// Motor-indexed operations fail with
/// [`ParamError::InvalidMotor`](crate::error::ParamError::InvalidMotor) for
/// indices at or above [`Channel::number_of_motors`].
pub trait Channel {
    /// Run at `velocity` (signed).
    fn rotate(&mut self, motor: u8, velocity: i32) -> Result<()>;

    /// Run in the positive direction.
    fn right(&mut self, motor: u8, velocity: i32) -> Result<()> {
        self.rotate(motor, velocity)
    }

    /// Run in the negative direction.
    fn left(&mut self, motor: u8, velocity: i32) -> Result<()> {
        self.rotate(motor, velocity.wrapping_neg())
    }

    /// Stop.
    fn stop(&mut self, motor: u8) -> Result<()> {
        self.rotate(motor, 0)
    }

    /// Move to an absolute position.
    fn move_to(&mut self, motor: u8, position: i32) -> Result<()>;

    /// Move relative to the current position. Returns the absolute target.
    fn move_by(&mut self, motor: u8, delta: i32) -> Result<i32>;

    /// Read a driver register. Bus faults yield 0 and raise
    /// [`ErrorFlags::BUS`].
    fn read_register(&mut self, address: RegisterAddress) -> i32;

    /// Write a driver register.
    fn write_register(&mut self, address: RegisterAddress, value: i32);

    /// Read a logical parameter by host type code.
    fn get_parameter(&mut self, code: u8, motor: u8) -> Result<i32>;

    /// Write a logical parameter by host type code.
    fn set_parameter(&mut self, code: u8, motor: u8, value: i32) -> Result<()>;

    /// Board-specific diagnostic function.
    ///
    /// Returns the function's output value (0 for functions without one).
    fn user_function(&mut self, code: u8, motor: u8, value: i32) -> Result<i32>;

    /// Health tick. Returns the flags raised since the previous tick and
    /// clears them.
    fn check_errors(&mut self, tick: u32) -> ErrorFlags;

    /// Currently raised error flags.
    fn errors(&self) -> ErrorFlags;

    /// Apply a driver enable request.
    fn enable_driver(&mut self, state: DriverState, system: &SystemConfig) -> Result<()>;

    /// Periodic housekeeping.
    fn periodic_job(&mut self, tick: u32);

    /// Start pushing power-on register values. `false` if busy.
    fn reset(&mut self) -> bool;

    /// Start pushing the shadow register values. `false` if busy.
    fn restore(&mut self) -> bool;

    /// Disable the driver and release the motion generator.
    fn deinit(&mut self) -> Result<()>;

    /// Number of motors on the channel.
    fn number_of_motors(&self) -> u8;

    /// Lowest supported supply voltage (0.1 V).
    fn vm_min(&self) -> u16;

    /// Highest supported supply voltage (0.1 V).
    fn vm_max(&self) -> u16;
}
