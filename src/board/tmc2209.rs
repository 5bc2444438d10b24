//! TMC2209 step/direction board with UART register access.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::config::{validate_channel, ChannelConfig, SystemConfig};
use crate::dispatch::{MotionGenerator, ParameterDispatch};
use crate::error::{ConfigError, Error, ParamError, PinError, Result};
use crate::protocol::RegisterAddress;
use crate::register::RegisterSpace;

use super::channel::{Channel, DriverState};
use super::health::{ErrorFlags, HealthMonitor};
use super::pins::{BoardPins, IoState, PinSelect};

/// One TMC2209 channel: motion generator, UART register engine, control pins
/// and the UC_PWM timer.
///
/// Generic over:
/// - `G`: motion generator (must implement [`MotionGenerator`])
/// - `R`: register access (must implement [`RegisterSpace`])
/// - `PIN`: control pin type (must implement `OutputPin`)
/// - `PWM`: UC_PWM timer channel (must implement `SetDutyCycle`)
pub struct Tmc2209Board<G, R, PIN, PWM>
where
    G: MotionGenerator,
    R: RegisterSpace,
    PIN: OutputPin,
    PWM: SetDutyCycle,
{
    dispatch: ParameterDispatch<G, R>,
    pins: BoardPins<PIN>,
    pwm: PWM,
    health: HealthMonitor,
}

impl<G, R, PIN, PWM> Tmc2209Board<G, R, PIN, PWM>
where
    G: MotionGenerator,
    R: RegisterSpace,
    PIN: OutputPin,
    PWM: SetDutyCycle,
{
    /// Create a builder.
    pub fn builder() -> Tmc2209BoardBuilder<G, R, PIN, PWM> {
        Tmc2209BoardBuilder::new()
    }

    /// Parameter dispatch.
    pub fn dispatch(&self) -> &ParameterDispatch<G, R> {
        &self.dispatch
    }

    /// Parameter dispatch, mutably.
    pub fn dispatch_mut(&mut self) -> &mut ParameterDispatch<G, R> {
        &mut self.dispatch
    }

    /// Control pins.
    pub fn pins(&self) -> &BoardPins<PIN> {
        &self.pins
    }

    /// Report a supply voltage measurement (0.1 V) to the health monitor.
    pub fn observe_supply(&mut self, vm: u16) {
        self.health.observe_supply(vm);
    }

    /// Set the UC_PWM duty cycle in percent, clamped to 0..=100.
    ///
    /// # Errors
    ///
    /// [`PinError::Io`] if the timer rejects the duty cycle.
    pub fn set_pwm_duty(&mut self, percent: i32) -> Result<()> {
        let percent = percent.clamp(0, 100) as u8;
        self.pwm
            .set_duty_cycle_percent(percent)
            .map_err(|_| PinError::Io)?;
        Ok(())
    }

    /// Give back the generator, register access, pins and timer.
    pub fn release(self) -> (G, R, BoardPins<PIN>, PWM) {
        let (generator, registers) = self.dispatch.release();
        (generator, registers, self.pins, self.pwm)
    }

    fn collect_bus_fault(&mut self) {
        if self.dispatch.registers_mut().take_fault().is_some() {
            self.health.report(ErrorFlags::BUS);
        }
    }
}

impl<G, R, PIN, PWM> Channel for Tmc2209Board<G, R, PIN, PWM>
where
    G: MotionGenerator,
    R: RegisterSpace,
    PIN: OutputPin,
    PWM: SetDutyCycle,
{
    fn rotate(&mut self, motor: u8, velocity: i32) -> Result<()> {
        self.dispatch.rotate(motor, velocity)
    }

    fn move_to(&mut self, motor: u8, position: i32) -> Result<()> {
        self.dispatch.move_to(motor, position)
    }

    fn move_by(&mut self, motor: u8, delta: i32) -> Result<i32> {
        self.dispatch.move_by(motor, delta)
    }

    fn read_register(&mut self, address: RegisterAddress) -> i32 {
        let value = self.dispatch.read_register(address);
        self.collect_bus_fault();
        value
    }

    fn write_register(&mut self, address: RegisterAddress, value: i32) {
        self.dispatch.write_register(address, value);
    }

    fn get_parameter(&mut self, code: u8, motor: u8) -> Result<i32> {
        self.dispatch.get_raw(code, motor)
    }

    fn set_parameter(&mut self, code: u8, motor: u8, value: i32) -> Result<()> {
        self.dispatch.set_raw(code, motor, value)
    }

    fn user_function(&mut self, code: u8, motor: u8, value: i32) -> Result<i32> {
        match code {
            0 => Ok(self.dispatch.generator().status(motor)),
            1 => {
                self.dispatch
                    .registers_mut()
                    .set_slave_address((value & 0xFF) as u8);
                Ok(0)
            }
            2 => Ok(i32::from(self.dispatch.registers().slave_address())),
            4 => {
                self.set_pwm_duty(value)?;
                Ok(0)
            }
            5 => {
                // motor selects the pin
                self.pins
                    .get_mut(PinSelect::from_index(motor))
                    .set_state(IoState::from_bits(value))?;
                Ok(0)
            }
            6 => Ok(self.pins.get_mut(PinSelect::from_index(motor)).state().bits()),
            _ => {
                debug!("unknown user function {}", code);
                Err(ParamError::UnknownParameter(code).into())
            }
        }
    }

    fn check_errors(&mut self, tick: u32) -> ErrorFlags {
        self.health.tick(tick)
    }

    fn errors(&self) -> ErrorFlags {
        self.health.flags()
    }

    fn enable_driver(&mut self, state: DriverState, system: &SystemConfig) -> Result<()> {
        match state.resolve(system) {
            DriverState::Disabled => {
                debug!("driver disabled");
                self.pins.enn.set_high()?;
            }
            DriverState::Enabled if system.driver_enable => {
                debug!("driver enabled");
                self.pins.enn.set_low()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn periodic_job(&mut self, tick: u32) {
        self.dispatch.registers_mut().periodic_job(tick);
        for motor in 0..self.dispatch.motors() {
            self.dispatch.generator_mut().periodic_job(motor);
        }
    }

    fn reset(&mut self) -> bool {
        self.dispatch.registers_mut().reset()
    }

    fn restore(&mut self) -> bool {
        self.dispatch.registers_mut().restore()
    }

    fn deinit(&mut self) -> Result<()> {
        self.pins.enn.set_high()?;
        self.dispatch.generator_mut().deinit();
        Ok(())
    }

    fn number_of_motors(&self) -> u8 {
        self.dispatch.motors()
    }

    fn vm_min(&self) -> u16 {
        self.health.vm_min()
    }

    fn vm_max(&self) -> u16 {
        self.health.vm_max()
    }
}

/// Builder for [`Tmc2209Board`].
pub struct Tmc2209BoardBuilder<G, R, PIN, PWM>
where
    G: MotionGenerator,
    R: RegisterSpace,
    PIN: OutputPin,
    PWM: SetDutyCycle,
{
    config: ChannelConfig,
    generator: Option<G>,
    registers: Option<R>,
    pins: Option<BoardPins<PIN>>,
    pwm: Option<PWM>,
}

impl<G, R, PIN, PWM> Default for Tmc2209BoardBuilder<G, R, PIN, PWM>
where
    G: MotionGenerator,
    R: RegisterSpace,
    PIN: OutputPin,
    PWM: SetDutyCycle,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, R, PIN, PWM> Tmc2209BoardBuilder<G, R, PIN, PWM>
where
    G: MotionGenerator,
    R: RegisterSpace,
    PIN: OutputPin,
    PWM: SetDutyCycle,
{
    /// Create a new builder with the default channel configuration.
    pub fn new() -> Self {
        Self {
            config: ChannelConfig::default(),
            generator: None,
            registers: None,
            pins: None,
            pwm: None,
        }
    }

    /// Set the motion generator.
    pub fn generator(mut self, generator: G) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the register access.
    pub fn registers(mut self, registers: R) -> Self {
        self.registers = Some(registers);
        self
    }

    /// Set the control pins.
    pub fn pins(mut self, pins: BoardPins<PIN>) -> Self {
        self.pins = Some(pins);
        self
    }

    /// Set the UC_PWM timer channel.
    pub fn pwm(mut self, pwm: PWM) -> Self {
        self.pwm = Some(pwm);
        self
    }

    /// Configure from a ChannelConfig.
    pub fn from_channel_config(mut self, config: &ChannelConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Configure from SystemConfig by channel name.
    pub fn from_config(self, config: &SystemConfig, channel_name: &str) -> Result<Self> {
        let channel = config.require_channel(channel_name)?;
        Ok(self.from_channel_config(channel))
    }

    /// Build the board.
    ///
    /// Seeds every motor's velocity limit and acceleration from the channel
    /// configuration, then enables the driver against `system`'s global enable.
    ///
    /// # Errors
    ///
    /// Returns an error if a component is missing, the channel configuration
    /// is invalid, or the enable pin cannot be driven.
    pub fn build(self, system: &SystemConfig) -> Result<Tmc2209Board<G, R, PIN, PWM>> {
        validate_channel(&self.config)?;

        let mut generator = self
            .generator
            .ok_or(Error::Config(ConfigError::MissingComponent("generator")))?;
        let registers = self
            .registers
            .ok_or(Error::Config(ConfigError::MissingComponent("registers")))?;
        let pins = self
            .pins
            .ok_or(Error::Config(ConfigError::MissingComponent("pins")))?;
        let pwm = self
            .pwm
            .ok_or(Error::Config(ConfigError::MissingComponent("pwm")))?;

        for motor in 0..self.config.motors {
            generator.set_velocity_max(motor, self.config.velocity_max.saturating_abs());
            generator.set_acceleration(motor, self.config.acceleration);
        }

        let mut board = Tmc2209Board {
            dispatch: ParameterDispatch::new(generator, registers, self.config.motors),
            pins,
            pwm,
            health: HealthMonitor::from_config(&self.config),
        };
        board.enable_driver(DriverState::Enabled, system)?;

        Ok(board)
    }
}
