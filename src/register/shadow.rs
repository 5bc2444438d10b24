//! Shadow register file and configuration push state.

use crate::protocol::registers::{DEFAULT_ACCESS, DEFAULT_RESET_STATE};
use crate::protocol::{Access, RegisterAddress, REGISTER_COUNT};

/// Progress of pushing a configuration to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigState {
    /// Nothing pending.
    Ready,
    /// Writing power-on values to every resettable register.
    Reset,
    /// Writing shadow values back to every restorable register.
    Restore,
}

/// Local mirror of the device's register space.
///
/// Holds the last value written to every register, the per-register access
/// flags and the values a reset pushes.
#[derive(Debug, Clone)]
pub struct RegisterFile {
    values: [i32; REGISTER_COUNT],
    access: [Access; REGISTER_COUNT],
    reset_state: [i32; REGISTER_COUNT],
    state: ConfigState,
    config_index: usize,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Create a register file with the TMC2209 tables.
    ///
    /// Starts in [`ConfigState::Reset`] so the first periodic jobs bring the
    /// device to its configured power-on state.
    pub fn new() -> Self {
        Self::with_tables(DEFAULT_ACCESS, DEFAULT_RESET_STATE)
    }

    /// Create a register file from custom access and reset tables.
    pub fn with_tables(
        access: [Access; REGISTER_COUNT],
        reset_state: [i32; REGISTER_COUNT],
    ) -> Self {
        Self {
            values: reset_state,
            access,
            reset_state,
            state: ConfigState::Reset,
            config_index: 0,
        }
    }

    /// Last value written to `address`.
    #[inline]
    pub fn value(&self, address: RegisterAddress) -> i32 {
        self.values[address.index()]
    }

    /// Access flags of `address`.
    #[inline]
    pub fn access(&self, address: RegisterAddress) -> Access {
        self.access[address.index()]
    }

    /// Record a value written to the device and mark it dirty.
    pub fn record_write(&mut self, address: RegisterAddress, value: i32) {
        let index = address.index();
        self.values[index] = value;
        self.access[index] = self.access[index].with(Access::DIRTY);
    }

    /// Current configuration state.
    #[inline]
    pub fn state(&self) -> ConfigState {
        self.state
    }

    /// Start pushing power-on values.
    ///
    /// Clears all dirty flags and wipes the shadow values. Returns `false` if
    /// another push is still in progress.
    pub fn begin_reset(&mut self) -> bool {
        if self.state != ConfigState::Ready {
            return false;
        }

        for (value, access) in self.values.iter_mut().zip(self.access.iter_mut()) {
            *value = 0;
            *access = access.without(Access::DIRTY);
        }
        self.state = ConfigState::Reset;
        self.config_index = 0;
        true
    }

    /// Start pushing shadow values back.
    ///
    /// Returns `false` if another push is still in progress.
    pub fn begin_restore(&mut self) -> bool {
        if self.state != ConfigState::Ready {
            return false;
        }

        self.state = ConfigState::Restore;
        self.config_index = 0;
        true
    }

    /// Next register write of the running push, if any.
    ///
    /// Returns `None` and goes back to [`ConfigState::Ready`] once every
    /// eligible register has been handed out.
    pub fn next_pending_write(&mut self) -> Option<(RegisterAddress, i32)> {
        let pending = match self.state {
            ConfigState::Ready => return None,
            ConfigState::Reset => (self.config_index..REGISTER_COUNT)
                .find(|&i| self.access[i].is_resettable())
                .map(|i| (i, self.reset_state[i])),
            ConfigState::Restore => (self.config_index..REGISTER_COUNT)
                .find(|&i| self.access[i].is_restorable())
                .map(|i| (i, self.values[i])),
        };

        match pending {
            Some((index, value)) => {
                self.config_index = index + 1;
                Some((RegisterAddress::new(index as u8), value))
            }
            None => {
                self.state = ConfigState::Ready;
                self.config_index = REGISTER_COUNT;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::reg;

    fn drain(file: &mut RegisterFile) -> std::vec::Vec<(u8, i32)> {
        let mut writes = std::vec::Vec::new();
        while let Some((address, value)) = file.next_pending_write() {
            file.record_write(address, value);
            writes.push((address.value(), value));
        }
        writes
    }

    #[test]
    fn test_initial_reset_pushes_defaults() {
        let mut file = RegisterFile::new();
        assert_eq!(file.state(), ConfigState::Reset);

        let writes = drain(&mut file);
        assert_eq!(file.state(), ConfigState::Ready);

        assert!(writes.contains(&(reg::GCONF, 0x40)));
        assert!(writes.contains(&(reg::IHOLD_IRUN, 0x0007_1703)));
        assert!(writes.contains(&(reg::CHOPCONF, 0x1000_0053)));
        // read-only registers are never written
        assert!(!writes.iter().any(|&(a, _)| a == reg::DRV_STATUS || a == reg::IFCNT));
        // in address order
        assert!(writes.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_restore_pushes_write_only_and_dirty() {
        let mut file = RegisterFile::new();
        drain(&mut file);

        // wipe shadow values and dirty flags without recording any writes
        assert!(file.begin_reset());
        while file.next_pending_write().is_some() {}

        file.record_write(RegisterAddress::new(reg::PWMCONF), 0x1234);
        assert!(file.begin_restore());
        let writes = drain(&mut file);

        assert!(writes.contains(&(reg::PWMCONF, 0x1234)));
        // write-only registers are always restored
        assert!(writes.contains(&(reg::IHOLD_IRUN, 0)));
        // readable and clean
        assert!(!writes.iter().any(|&(a, _)| a == reg::GCONF));
        assert!(!writes.iter().any(|&(a, _)| a == reg::DRV_STATUS));
    }

    #[test]
    fn test_reset_wipes_shadow_and_dirty() {
        let mut file = RegisterFile::new();
        drain(&mut file);
        file.record_write(RegisterAddress::new(reg::GCONF), 0x1C0);

        assert!(file.begin_reset());
        assert_eq!(file.value(RegisterAddress::new(reg::GCONF)), 0);
        assert!(!file.access(RegisterAddress::new(reg::GCONF)).contains(Access::DIRTY));
    }

    #[test]
    fn test_push_cannot_be_restarted_while_running() {
        let mut file = RegisterFile::new();
        assert!(!file.begin_reset());
        assert!(!file.begin_restore());

        drain(&mut file);
        assert!(file.begin_restore());
        assert!(!file.begin_reset());
    }

    #[test]
    fn test_ready_has_nothing_pending() {
        let mut file = RegisterFile::new();
        drain(&mut file);
        assert_eq!(file.next_pending_write(), None);
        assert_eq!(file.state(), ConfigState::Ready);
    }
}
