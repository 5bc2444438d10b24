//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{ChannelConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks every channel:
/// - At least one motor
/// - Supply bounds are ordered (min < max)
/// - Reply timeout is non-zero
/// - The CRC polynomial is non-zero
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_name, channel) in config.channels.iter() {
        validate_channel(channel)?;
    }

    Ok(())
}

/// Validate a single channel configuration.
pub fn validate_channel(config: &ChannelConfig) -> Result<()> {
    if config.motors == 0 {
        return Err(Error::Config(ConfigError::InvalidMotorCount(config.motors)));
    }

    if config.vm_min >= config.vm_max {
        return Err(Error::Config(ConfigError::InvalidSupplyBounds {
            min: config.vm_min,
            max: config.vm_max,
        }));
    }

    if config.timeout_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidTimeout(config.timeout_ms)));
    }

    // A zero polynomial yields an all-zero table
    if config.crc_polynomial == 0 {
        return Err(Error::Config(ConfigError::InvalidPolynomial(config.crc_polynomial)));
    }

    Ok(())
}
