//! Seam to the step/direction motion generator.

/// Step/direction motion generator driving the motor outputs.
///
/// The generator owns all motion state. Parameter dispatch only forwards to
/// it and never caches positions or velocities.
pub trait MotionGenerator {
    /// Run continuously at `velocity` (signed, 0 stops).
    fn rotate(&mut self, motor: u8, velocity: i32);

    /// Start a positioning move to the absolute `position`.
    fn move_to(&mut self, motor: u8, position: i32);

    /// Target of the current positioning move.
    fn target_position(&self, motor: u8) -> i32;

    /// Current position.
    fn actual_position(&self, motor: u8) -> i32;

    /// Overwrite the current position without moving.
    fn set_actual_position(&mut self, motor: u8, position: i32);

    /// Velocity the generator is ramping towards.
    fn target_velocity(&self, motor: u8) -> i32;

    /// Current velocity.
    fn actual_velocity(&self, motor: u8) -> i32;

    /// Velocity limit for positioning moves.
    fn velocity_max(&self, motor: u8) -> i32;

    /// Set the velocity limit. Always called with a non-negative value.
    fn set_velocity_max(&mut self, motor: u8, velocity: i32);

    /// Acceleration used for ramps.
    fn acceleration(&self, motor: u8) -> i32;

    /// Set the ramp acceleration.
    fn set_acceleration(&mut self, motor: u8, acceleration: i32);

    /// Generator status bits.
    fn status(&self, motor: u8) -> i32;

    /// Periodic housekeeping, called from the channel's periodic job.
    fn periodic_job(&mut self, motor: u8);

    /// Stop all outputs and release resources.
    fn deinit(&mut self) {}
}

impl<T: MotionGenerator + ?Sized> MotionGenerator for &mut T {
    fn rotate(&mut self, motor: u8, velocity: i32) {
        (**self).rotate(motor, velocity)
    }

    fn move_to(&mut self, motor: u8, position: i32) {
        (**self).move_to(motor, position)
    }

    fn target_position(&self, motor: u8) -> i32 {
        (**self).target_position(motor)
    }

    fn actual_position(&self, motor: u8) -> i32 {
        (**self).actual_position(motor)
    }

    fn set_actual_position(&mut self, motor: u8, position: i32) {
        (**self).set_actual_position(motor, position)
    }

    fn target_velocity(&self, motor: u8) -> i32 {
        (**self).target_velocity(motor)
    }

    fn actual_velocity(&self, motor: u8) -> i32 {
        (**self).actual_velocity(motor)
    }

    fn velocity_max(&self, motor: u8) -> i32 {
        (**self).velocity_max(motor)
    }

    fn set_velocity_max(&mut self, motor: u8, velocity: i32) {
        (**self).set_velocity_max(motor, velocity)
    }

    fn acceleration(&self, motor: u8) -> i32 {
        (**self).acceleration(motor)
    }

    fn set_acceleration(&mut self, motor: u8, acceleration: i32) {
        (**self).set_acceleration(motor, acceleration)
    }

    fn status(&self, motor: u8) -> i32 {
        (**self).status(motor)
    }

    fn periodic_job(&mut self, motor: u8) {
        (**self).periodic_job(motor)
    }

    fn deinit(&mut self) {
        (**self).deinit()
    }
}
