//! Per-channel configuration from TOML.

use serde::Deserialize;

use crate::protocol::{Crc8, FrameCodec, TMC_POLYNOMIAL};
use crate::transport::{DEFAULT_SETTLE_MS, DEFAULT_TIMEOUT_MS};

/// Configuration of one driver channel on the bus.
///
/// Every field has a default matching a single TMC2209 at slave address 0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Number of motors driven by the channel.
    pub motors: u8,

    /// UART slave address of the driver (0-3 on a TMC2209).
    pub slave_address: u8,

    /// Reply timeout in milliseconds.
    pub timeout_ms: u32,

    /// Bus turnaround wait after transmitting, in milliseconds.
    pub settle_ms: u32,

    /// Lowest supported supply voltage in units of 0.1 V.
    pub vm_min: u16,

    /// Highest supported supply voltage in units of 0.1 V.
    pub vm_max: u16,

    /// CRC-8 polynomial.
    pub crc_polynomial: u8,

    /// Whether the CRC table is reflected.
    pub crc_reflected: bool,

    /// Velocity limit seeded into the motion generator.
    pub velocity_max: i32,

    /// Acceleration seeded into the motion generator.
    pub acceleration: i32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            motors: 1,
            slave_address: 0,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            vm_min: 50,
            vm_max: 390,
            crc_polynomial: TMC_POLYNOMIAL,
            crc_reflected: true,
            velocity_max: 51200,
            acceleration: 51200,
        }
    }
}

impl ChannelConfig {
    /// Frame codec using the configured checksum.
    pub fn codec(&self) -> FrameCodec {
        FrameCodec::new(Crc8::new(self.crc_polynomial, self.crc_reflected))
    }

    /// Whether `vm` (0.1 V units) lies within the supply bounds.
    #[inline]
    pub fn supply_in_range(&self, vm: u16) -> bool {
        (self.vm_min..=self.vm_max).contains(&vm)
    }
}
