//! Channel health monitor.

use core::ops::{BitOr, BitOrAssign};

use crate::config::ChannelConfig;

/// Channel error bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrorFlags(u8);

impl ErrorFlags {
    /// No error.
    pub const NONE: Self = Self(0);
    /// Supply voltage fault.
    pub const VM: Self = Self(1 << 0);
    /// Supply voltage below the channel minimum.
    pub const VM_UNDER: Self = Self(1 << 1);
    /// Supply voltage above the channel maximum.
    pub const VM_OVER: Self = Self(1 << 2);
    /// A register read timed out or returned a damaged reply.
    pub const BUS: Self = Self(1 << 3);

    /// Flags from raw bits.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// No flag set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ErrorFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ErrorFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Level-triggered error aggregation for one channel.
///
/// Producers report between ticks; every [`HealthMonitor::tick`] clears the
/// mask, so a fault stays visible only while it keeps being reported.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    flags: ErrorFlags,
    vm_min: u16,
    vm_max: u16,
}

impl HealthMonitor {
    /// Create a monitor with supply bounds in units of 0.1 V.
    pub fn new(vm_min: u16, vm_max: u16) -> Self {
        Self {
            flags: ErrorFlags::NONE,
            vm_min,
            vm_max,
        }
    }

    /// Create a monitor from a channel's supply bounds.
    pub fn from_config(config: &ChannelConfig) -> Self {
        Self::new(config.vm_min, config.vm_max)
    }

    /// Current flags.
    #[inline]
    pub fn flags(&self) -> ErrorFlags {
        self.flags
    }

    /// Lower supply bound.
    #[inline]
    pub fn vm_min(&self) -> u16 {
        self.vm_min
    }

    /// Upper supply bound.
    #[inline]
    pub fn vm_max(&self) -> u16 {
        self.vm_max
    }

    /// Raise `flags` until the next tick.
    pub fn report(&mut self, flags: ErrorFlags) {
        self.flags |= flags;
    }

    /// Compare a supply measurement against the bounds.
    pub fn observe_supply(&mut self, vm: u16) {
        if vm < self.vm_min {
            warn!("supply {} below {}", vm, self.vm_min);
            self.report(ErrorFlags::VM | ErrorFlags::VM_UNDER);
        } else if vm > self.vm_max {
            warn!("supply {} above {}", vm, self.vm_max);
            self.report(ErrorFlags::VM | ErrorFlags::VM_OVER);
        }
    }

    /// Clear the mask. Returns the flags raised since the previous tick.
    pub fn tick(&mut self, _now: u32) -> ErrorFlags {
        core::mem::take(&mut self.flags)
    }
}
