//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use crate::error::{ConfigError, Error, Result};

use super::channel::ChannelConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Global driver enable, shared by every channel.
    ///
    /// Channels asked to follow the global state, or to enable, only drive
    /// their enable pin active while this is set.
    #[serde(default = "default_driver_enable")]
    pub driver_enable: bool,

    /// Named channel configurations.
    #[serde(default)]
    pub channels: FnvIndexMap<String<32>, ChannelConfig, 4>,
}

fn default_driver_enable() -> bool {
    true
}

impl SystemConfig {
    /// Get a channel configuration by name.
    pub fn channel(&self, name: &str) -> Option<&ChannelConfig> {
        self.channels
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a channel configuration by name, failing if it is missing.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ChannelNotFound`] if no channel has that name.
    pub fn require_channel(&self, name: &str) -> Result<&ChannelConfig> {
        self.channel(name).ok_or_else(|| {
            Error::Config(ConfigError::ChannelNotFound(
                String::try_from(name).unwrap_or_default(),
            ))
        })
    }

    /// List all channel names.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(|s| s.as_str())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            driver_enable: default_driver_enable(),
            channels: FnvIndexMap::new(),
        }
    }
}
