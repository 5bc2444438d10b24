//! Logical parameter identifiers and their access policies.

use crate::error::ParamError;

/// Whether a parameter may be read, written, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamAccess {
    /// Read only.
    ReadOnly,
    /// Write only.
    WriteOnly,
    /// Read and write.
    ReadWrite,
}

impl ParamAccess {
    /// Reads are allowed.
    #[inline]
    pub fn is_readable(self) -> bool {
        matches!(self, ParamAccess::ReadOnly | ParamAccess::ReadWrite)
    }

    /// Writes are allowed.
    #[inline]
    pub fn is_writable(self) -> bool {
        matches!(self, ParamAccess::WriteOnly | ParamAccess::ReadWrite)
    }
}

/// Component that backs a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// Forwarded to the motion generator.
    MotionGenerator,
    /// Held by the register engine.
    RegisterEngine,
}

/// Motion and configuration values addressable by host tools.
///
/// The discriminants are the type codes hosts use on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LogicalParameter {
    /// Target of the positioning move. Writing starts a move.
    TargetPosition = 0,
    /// Current position. Writing redefines it without moving.
    ActualPosition = 1,
    /// Target velocity. Writing starts velocity mode.
    TargetVelocity = 2,
    /// Current velocity.
    ActualVelocity = 3,
    /// Velocity limit; written magnitudes are made non-negative.
    MaxVelocity = 4,
    /// Ramp acceleration.
    MaxAcceleration = 5,
    /// UART slave address of the driver.
    SlaveAddress = 6,
}

impl LogicalParameter {
    /// Every parameter, in type code order.
    pub const ALL: [LogicalParameter; 7] = [
        LogicalParameter::TargetPosition,
        LogicalParameter::ActualPosition,
        LogicalParameter::TargetVelocity,
        LogicalParameter::ActualVelocity,
        LogicalParameter::MaxVelocity,
        LogicalParameter::MaxAcceleration,
        LogicalParameter::SlaveAddress,
    ];

    /// Host type code.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Access policy.
    pub fn access(self) -> ParamAccess {
        match self {
            LogicalParameter::ActualVelocity => ParamAccess::ReadOnly,
            LogicalParameter::TargetPosition
            | LogicalParameter::ActualPosition
            | LogicalParameter::TargetVelocity
            | LogicalParameter::MaxVelocity
            | LogicalParameter::MaxAcceleration
            | LogicalParameter::SlaveAddress => ParamAccess::ReadWrite,
        }
    }

    /// Component the parameter resolves to.
    pub fn resolution(self) -> Resolution {
        match self {
            LogicalParameter::SlaveAddress => Resolution::RegisterEngine,
            LogicalParameter::TargetPosition
            | LogicalParameter::ActualPosition
            | LogicalParameter::TargetVelocity
            | LogicalParameter::ActualVelocity
            | LogicalParameter::MaxVelocity
            | LogicalParameter::MaxAcceleration => Resolution::MotionGenerator,
        }
    }
}

impl TryFrom<u8> for LogicalParameter {
    type Error = ParamError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        LogicalParameter::ALL
            .get(code as usize)
            .copied()
            .ok_or(ParamError::UnknownParameter(code))
    }
}
