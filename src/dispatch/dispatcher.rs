//! Routing of logical parameter accesses.

use crate::error::{ParamError, Result};
use crate::protocol::RegisterAddress;
use crate::register::RegisterSpace;

use super::motion::MotionGenerator;
use super::parameter::LogicalParameter;

/// Routes logical parameter reads and writes to the motion generator or the
/// register engine.
///
/// Holds no motion state of its own. Every access checks the motor index
/// against the configured motor count first.
pub struct ParameterDispatch<G, R>
where
    G: MotionGenerator,
    R: RegisterSpace,
{
    generator: G,
    registers: R,
    motors: u8,
}

impl<G, R> ParameterDispatch<G, R>
where
    G: MotionGenerator,
    R: RegisterSpace,
{
    /// Create a dispatcher for `motors` motors.
    pub fn new(generator: G, registers: R, motors: u8) -> Self {
        Self {
            generator,
            registers,
            motors,
        }
    }

    /// Number of motors.
    #[inline]
    pub fn motors(&self) -> u8 {
        self.motors
    }

    /// The motion generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The motion generator, mutably.
    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    /// The register space.
    pub fn registers(&self) -> &R {
        &self.registers
    }

    /// The register space, mutably.
    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.registers
    }

    /// Give back the generator and the register space.
    pub fn release(self) -> (G, R) {
        (self.generator, self.registers)
    }

    /// Check that `motor` is below the motor count.
    ///
    /// # Errors
    ///
    /// [`ParamError::InvalidMotor`] otherwise.
    pub fn check_motor(&self, motor: u8) -> Result<()> {
        if motor >= self.motors {
            debug!("motor {} rejected, {} configured", motor, self.motors);
            return Err(ParamError::InvalidMotor(motor).into());
        }
        Ok(())
    }

    /// Read a logical parameter.
    ///
    /// # Errors
    ///
    /// [`ParamError::InvalidMotor`] for an out-of-range motor,
    /// [`ParamError::UnsupportedOperation`] for a write-only parameter.
    pub fn get(&mut self, param: LogicalParameter, motor: u8) -> Result<i32> {
        self.check_motor(motor)?;
        if !param.access().is_readable() {
            return Err(ParamError::UnsupportedOperation.into());
        }

        let value = match param {
            LogicalParameter::TargetPosition => self.generator.target_position(motor),
            LogicalParameter::ActualPosition => self.generator.actual_position(motor),
            LogicalParameter::TargetVelocity => self.generator.target_velocity(motor),
            LogicalParameter::ActualVelocity => self.generator.actual_velocity(motor),
            LogicalParameter::MaxVelocity => self.generator.velocity_max(motor),
            LogicalParameter::MaxAcceleration => self.generator.acceleration(motor),
            LogicalParameter::SlaveAddress => i32::from(self.registers.slave_address()),
        };
        Ok(value)
    }

    /// Write a logical parameter.
    ///
    /// `MaxVelocity` stores the magnitude of `value`. `SlaveAddress` keeps
    /// the low byte.
    ///
    /// # Errors
    ///
    /// [`ParamError::InvalidMotor`] for an out-of-range motor,
    /// [`ParamError::UnsupportedOperation`] for a read-only parameter.
    pub fn set(&mut self, param: LogicalParameter, motor: u8, value: i32) -> Result<()> {
        self.check_motor(motor)?;
        if !param.access().is_writable() {
            debug!("write to read-only parameter {} rejected", param.code());
            return Err(ParamError::UnsupportedOperation.into());
        }

        match param {
            LogicalParameter::TargetPosition => self.generator.move_to(motor, value),
            LogicalParameter::ActualPosition => self.generator.set_actual_position(motor, value),
            LogicalParameter::TargetVelocity => self.generator.rotate(motor, value),
            LogicalParameter::MaxVelocity => {
                self.generator.set_velocity_max(motor, value.saturating_abs())
            }
            LogicalParameter::MaxAcceleration => self.generator.set_acceleration(motor, value),
            LogicalParameter::SlaveAddress => self.registers.set_slave_address(value as u8),
            // rejected by the access policy above
            LogicalParameter::ActualVelocity => {
                return Err(ParamError::UnsupportedOperation.into())
            }
        }
        Ok(())
    }

    /// Read a parameter by host type code.
    ///
    /// # Errors
    ///
    /// As [`ParameterDispatch::get`], plus [`ParamError::UnknownParameter`]
    /// for an unknown code. The motor is checked first.
    pub fn get_raw(&mut self, code: u8, motor: u8) -> Result<i32> {
        self.check_motor(motor)?;
        let param = LogicalParameter::try_from(code)?;
        self.get(param, motor)
    }

    /// Write a parameter by host type code.
    ///
    /// # Errors
    ///
    /// As [`ParameterDispatch::set`], plus [`ParamError::UnknownParameter`]
    /// for an unknown code. The motor is checked first.
    pub fn set_raw(&mut self, code: u8, motor: u8, value: i32) -> Result<()> {
        self.check_motor(motor)?;
        let param = LogicalParameter::try_from(code)?;
        self.set(param, motor, value)
    }

    /// Run `motor` at `velocity`.
    ///
    /// # Errors
    ///
    /// [`ParamError::InvalidMotor`] for an out-of-range motor.
    pub fn rotate(&mut self, motor: u8, velocity: i32) -> Result<()> {
        self.check_motor(motor)?;
        self.generator.rotate(motor, velocity);
        Ok(())
    }

    /// Move `motor` to the absolute `position`.
    ///
    /// # Errors
    ///
    /// [`ParamError::InvalidMotor`] for an out-of-range motor.
    pub fn move_to(&mut self, motor: u8, position: i32) -> Result<()> {
        self.check_motor(motor)?;
        self.generator.move_to(motor, position);
        Ok(())
    }

    /// Move `motor` by `delta` relative to its current position.
    ///
    /// Returns the absolute target. The current position is read and the move
    /// issued as two separate calls; a position change in between is not
    /// detected.
    ///
    /// # Errors
    ///
    /// [`ParamError::InvalidMotor`] for an out-of-range motor.
    pub fn move_by(&mut self, motor: u8, delta: i32) -> Result<i32> {
        self.check_motor(motor)?;
        let target = self.generator.actual_position(motor).wrapping_add(delta);
        self.generator.move_to(motor, target);
        Ok(target)
    }

    /// Lenient register read through the register space.
    pub fn read_register(&mut self, address: RegisterAddress) -> i32 {
        self.registers.read_register(address)
    }

    /// Register write through the register space.
    pub fn write_register(&mut self, address: RegisterAddress, value: i32) {
        self.registers.write_register(address, value)
    }
}
