//! TMC2209 register map: addresses, access flags and power-on defaults.

/// Size of the 7-bit register address space.
pub const REGISTER_COUNT: usize = 128;

/// Register addresses.
#[allow(missing_docs)]
pub mod reg {
    pub const GCONF: u8 = 0x00;
    pub const GSTAT: u8 = 0x01;
    pub const IFCNT: u8 = 0x02;
    pub const SLAVECONF: u8 = 0x03;
    pub const OTP_PROG: u8 = 0x04;
    pub const OTP_READ: u8 = 0x05;
    pub const IOIN: u8 = 0x06;
    pub const FACTORY_CONF: u8 = 0x07;
    pub const IHOLD_IRUN: u8 = 0x10;
    pub const TPOWERDOWN: u8 = 0x11;
    pub const TSTEP: u8 = 0x12;
    pub const TPWMTHRS: u8 = 0x13;
    pub const TCOOLTHRS: u8 = 0x14;
    pub const VACTUAL: u8 = 0x22;
    pub const SGTHRS: u8 = 0x40;
    pub const SG_RESULT: u8 = 0x41;
    pub const COOLCONF: u8 = 0x42;
    pub const MSCNT: u8 = 0x6A;
    pub const MSCURACT: u8 = 0x6B;
    pub const CHOPCONF: u8 = 0x6C;
    pub const DRV_STATUS: u8 = 0x6F;
    pub const PWMCONF: u8 = 0x70;
    pub const PWM_SCALE: u8 = 0x71;
    pub const PWM_AUTO: u8 = 0x72;
}

/// Access flags of one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Access(u8);

impl Access {
    /// Not implemented by the device.
    pub const NONE: Self = Self(0x00);
    /// Readable over the bus.
    pub const READ: Self = Self(0x01);
    /// Writable over the bus.
    pub const WRITE: Self = Self(0x02);
    /// Readable and writable.
    pub const READ_WRITE: Self = Self(0x03);
    /// Shadow value changed since the last reset.
    pub const DIRTY: Self = Self(0x08);
    /// Writing ones clears flags (status registers).
    pub const WRITE_CLEARS: Self = Self(0x20);
    /// Value is preset by hardware and must not be overwritten on reset.
    pub const HW_PRESET: Self = Self(0x40);

    /// Raw flag bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether all bits of `other` are set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flags with `other` added.
    #[inline]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Flags with `other` removed.
    #[inline]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// The register can be read over the bus.
    #[inline]
    pub const fn is_readable(self) -> bool {
        self.contains(Self::READ)
    }

    /// The register can be written over the bus.
    #[inline]
    pub const fn is_writable(self) -> bool {
        self.contains(Self::WRITE)
    }

    /// A reset pushes the power-on value to this register.
    #[inline]
    pub const fn is_resettable(self) -> bool {
        self.is_writable() && !self.contains(Self::HW_PRESET)
    }

    /// A restore pushes the shadow value to this register.
    ///
    /// Write-only registers are always restored, readable ones only when dirty.
    #[inline]
    pub const fn is_restorable(self) -> bool {
        self.is_writable() && (!self.is_readable() || self.contains(Self::DIRTY))
    }
}

/// Access flags of every register after power-on.
pub const DEFAULT_ACCESS: [Access; REGISTER_COUNT] = {
    let mut table = [Access::NONE; REGISTER_COUNT];
    table[reg::GCONF as usize] = Access::READ_WRITE;
    table[reg::GSTAT as usize] = Access::READ_WRITE.with(Access::WRITE_CLEARS);
    table[reg::IFCNT as usize] = Access::READ;
    table[reg::SLAVECONF as usize] = Access::WRITE;
    table[reg::OTP_PROG as usize] = Access::WRITE;
    table[reg::OTP_READ as usize] = Access::READ;
    table[reg::IOIN as usize] = Access::READ;
    table[reg::FACTORY_CONF as usize] = Access::READ_WRITE;
    table[reg::IHOLD_IRUN as usize] = Access::WRITE;
    table[reg::TPOWERDOWN as usize] = Access::WRITE;
    table[reg::TSTEP as usize] = Access::READ;
    table[reg::TPWMTHRS as usize] = Access::WRITE;
    table[reg::TCOOLTHRS as usize] = Access::WRITE;
    table[reg::VACTUAL as usize] = Access::WRITE;
    table[reg::SGTHRS as usize] = Access::WRITE;
    table[reg::SG_RESULT as usize] = Access::READ;
    table[reg::COOLCONF as usize] = Access::WRITE;
    table[reg::MSCNT as usize] = Access::READ;
    table[reg::MSCURACT as usize] = Access::READ;
    table[reg::CHOPCONF as usize] = Access::READ_WRITE;
    table[reg::DRV_STATUS as usize] = Access::READ;
    table[reg::PWMCONF as usize] = Access::READ_WRITE;
    table[reg::PWM_SCALE as usize] = Access::READ;
    table[reg::PWM_AUTO as usize] = Access::READ;
    table
};

/// Register values pushed to the device by a reset.
pub const DEFAULT_RESET_STATE: [i32; REGISTER_COUNT] = {
    let mut table = [0i32; REGISTER_COUNT];
    table[reg::GCONF as usize] = 0x0000_0040;
    table[reg::IHOLD_IRUN as usize] = 0x0007_1703;
    table[reg::TPOWERDOWN as usize] = 0x0000_0014;
    table[reg::CHOPCONF as usize] = 0x1000_0053;
    table[reg::PWMCONF as usize] = 0xC10D_0024_u32 as i32;
    table
};
