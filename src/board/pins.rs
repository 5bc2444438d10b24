//! Driver control pins.

use embedded_hal::digital::OutputPin;

use crate::error::PinError;

/// Requested or reported pin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoState {
    /// Driven low.
    Low = 0,
    /// Driven high.
    High = 1,
    /// High impedance.
    Open = 2,
    /// Leave the pin as it is.
    NoChange = 3,
}

impl IoState {
    /// Decode the two low bits of a host value.
    pub fn from_bits(value: i32) -> Self {
        match value & 0x03 {
            0 => IoState::Low,
            1 => IoState::High,
            2 => IoState::Open,
            _ => IoState::NoChange,
        }
    }

    /// Host encoding.
    #[inline]
    pub fn bits(self) -> i32 {
        self as i32
    }
}

/// Control pins of the TMC2209, in host selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinSelect {
    /// Driver enable, active low.
    Enn,
    /// StealthChop/SpreadCycle select.
    Spread,
    /// Microstep select 1 / address bit 0.
    Ms1Ad0,
    /// Microstep select 2 / address bit 1.
    Ms2Ad1,
    /// Internal step pulse generator input.
    UcPwm,
    /// Standby.
    Stdby,
}

impl PinSelect {
    /// Pin for a host selector. Unknown selectors pick ENN.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => PinSelect::Spread,
            2 => PinSelect::Ms1Ad0,
            3 => PinSelect::Ms2Ad1,
            4 => PinSelect::UcPwm,
            5 => PinSelect::Stdby,
            _ => PinSelect::Enn,
        }
    }
}

/// Output pin that remembers the level it was last driven to.
///
/// Output-only HAL pins cannot be read back, so the reported state is the
/// last one set. Tri-stating is not available through `OutputPin`.
pub struct TrackedPin<PIN: OutputPin> {
    pin: PIN,
    state: IoState,
}

impl<PIN: OutputPin> TrackedPin<PIN> {
    /// Wrap a pin, driving it to `initial`.
    ///
    /// # Errors
    ///
    /// Returns a [`PinError`] if the pin cannot be driven.
    pub fn new(pin: PIN, initial: IoState) -> Result<Self, PinError> {
        let mut tracked = Self {
            pin,
            state: IoState::Low,
        };
        tracked.set_state(initial)?;
        Ok(tracked)
    }

    /// Wrap a pin that is already low.
    pub fn assume_low(pin: PIN) -> Self {
        Self {
            pin,
            state: IoState::Low,
        }
    }

    /// Drive the pin high.
    ///
    /// # Errors
    ///
    /// [`PinError::Io`] if the HAL fails.
    pub fn set_high(&mut self) -> Result<(), PinError> {
        self.set_state(IoState::High)
    }

    /// Drive the pin low.
    ///
    /// # Errors
    ///
    /// [`PinError::Io`] if the HAL fails.
    pub fn set_low(&mut self) -> Result<(), PinError> {
        self.set_state(IoState::Low)
    }

    /// Apply a host pin state.
    ///
    /// # Errors
    ///
    /// [`PinError::UnsupportedState`] for [`IoState::Open`],
    /// [`PinError::Io`] if the HAL fails.
    pub fn set_state(&mut self, state: IoState) -> Result<(), PinError> {
        match state {
            IoState::Low => self.pin.set_low().map_err(|_| PinError::Io)?,
            IoState::High => self.pin.set_high().map_err(|_| PinError::Io)?,
            IoState::Open => return Err(PinError::UnsupportedState),
            IoState::NoChange => return Ok(()),
        }
        self.state = state;
        Ok(())
    }

    /// Last driven state.
    #[inline]
    pub fn state(&self) -> IoState {
        self.state
    }

    /// Give back the pin.
    pub fn free(self) -> PIN {
        self.pin
    }
}

/// The six TMC2209 control pins.
pub struct BoardPins<PIN: OutputPin> {
    /// Driver enable, active low.
    pub enn: TrackedPin<PIN>,
    /// StealthChop/SpreadCycle select.
    pub spread: TrackedPin<PIN>,
    /// MS1 / AD0.
    pub ms1_ad0: TrackedPin<PIN>,
    /// MS2 / AD1.
    pub ms2_ad1: TrackedPin<PIN>,
    /// UC_PWM.
    pub uc_pwm: TrackedPin<PIN>,
    /// Standby.
    pub stdby: TrackedPin<PIN>,
}

impl<PIN: OutputPin> BoardPins<PIN> {
    /// Take the pins and drive them to their power-on levels.
    ///
    /// ENN starts high (driver off), everything else low.
    ///
    /// # Errors
    ///
    /// [`PinError::Io`] if any pin cannot be driven.
    pub fn new(
        enn: PIN,
        spread: PIN,
        ms1_ad0: PIN,
        ms2_ad1: PIN,
        uc_pwm: PIN,
        stdby: PIN,
    ) -> Result<Self, PinError> {
        Ok(Self {
            enn: TrackedPin::new(enn, IoState::High)?,
            spread: TrackedPin::new(spread, IoState::Low)?,
            ms1_ad0: TrackedPin::new(ms1_ad0, IoState::Low)?,
            ms2_ad1: TrackedPin::new(ms2_ad1, IoState::Low)?,
            uc_pwm: TrackedPin::new(uc_pwm, IoState::Low)?,
            stdby: TrackedPin::new(stdby, IoState::Low)?,
        })
    }

    /// Pin by selector.
    pub fn get_mut(&mut self, select: PinSelect) -> &mut TrackedPin<PIN> {
        match select {
            PinSelect::Enn => &mut self.enn,
            PinSelect::Spread => &mut self.spread,
            PinSelect::Ms1Ad0 => &mut self.ms1_ad0,
            PinSelect::Ms2Ad1 => &mut self.ms2_ad1,
            PinSelect::UcPwm => &mut self.uc_pwm,
            PinSelect::Stdby => &mut self.stdby,
        }
    }
}
