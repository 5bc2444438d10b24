//! TOML board configuration from files and strings (std only).

use std::fs;
use std::path::Path;

use heapless::String;

use crate::error::{ConfigError, Error, Result};

use super::{ChannelConfig, SystemConfig};

/// Copy as much of `text` as fits, cutting on a character boundary.
fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// One-based line of byte `offset` in `content`.
fn line_of(content: &str, offset: usize) -> usize {
    content
        .get(..offset)
        .map_or(1, |head| head.matches('\n').count() + 1)
}

/// Load a board configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or names a
/// channel that fails validation.
///
/// # Example
///
/// ```rust,ignore
/// use tmc2209_uart::load_config;
///
/// let board = load_config("board.toml")?;
/// let ch2 = board.require_channel("ch2")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        let msg = format!("{}: {}", path.display(), e);
        Error::Config(ConfigError::IoError(bounded(&msg)))
    })?;

    parse_config(&content)
}

/// Parse a board configuration from TOML text.
///
/// Parse errors carry the line they were found on.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or a channel fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content).map_err(|e| {
        let msg = match e.span() {
            Some(span) => format!("line {}: {}", line_of(content, span.start), e.message()),
            None => e.message().to_owned(),
        };
        Error::Config(ConfigError::ParseError(bounded(&msg)))
    })?;

    super::validation::validate_config(&config)?;
    debug!("parsed board configuration");

    Ok(config)
}

/// Parse a board configuration and pick out one channel.
///
/// # Errors
///
/// Returns an error if the text does not parse or validate, or if `name` is
/// not one of its channels.
pub fn parse_channel_config(content: &str, name: &str) -> Result<ChannelConfig> {
    parse_config(content)?.require_channel(name).cloned()
}
