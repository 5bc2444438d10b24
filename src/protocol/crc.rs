//! Table-driven CRC-8 shared with the driver IC.
//!
//! The TMC2209 computes its frame checksum MSB-first over data bytes fed
//! LSB-first, which is the same as a reflected table with a final bit reversal.

use crate::error::{ConfigError, Error, Result};

/// Polynomial used by TMC UART devices (x^8 + x^2 + x + 1).
pub const TMC_POLYNOMIAL: u8 = 0x07;

/// Number of table slots available in a [`Crc8Bank`] by default.
pub const CRC_TABLE_COUNT: usize = 2;

/// Ready-made table for TMC UART devices.
pub static TMC_CRC8: Crc8 = Crc8::new(TMC_POLYNOMIAL, true);

/// A precomputed 8-bit CRC lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crc8 {
    table: [u8; 256],
    polynomial: u8,
    reflected: bool,
}

impl Crc8 {
    /// Build the lookup table for `polynomial`.
    ///
    /// With `reflected` set, every table index and entry is bit-reversed and the
    /// final checksum is reversed once more.
    pub const fn new(polynomial: u8, reflected: bool) -> Self {
        let mut table = [0u8; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = if reflected {
                (i as u8).reverse_bits()
            } else {
                i as u8
            };

            let mut bit = 0;
            while bit < 8 {
                crc = if crc & 0x80 != 0 {
                    (crc << 1) ^ polynomial
                } else {
                    crc << 1
                };
                bit += 1;
            }

            table[i] = if reflected { crc.reverse_bits() } else { crc };
            i += 1;
        }

        Self {
            table,
            polynomial,
            reflected,
        }
    }

    /// The polynomial this table was built from.
    #[inline]
    pub fn polynomial(&self) -> u8 {
        self.polynomial
    }

    /// Whether the table is reflected.
    #[inline]
    pub fn is_reflected(&self) -> bool {
        self.reflected
    }

    /// Compute the checksum of `data`.
    pub fn checksum(&self, data: &[u8]) -> u8 {
        let crc = data
            .iter()
            .fold(0u8, |crc, &byte| self.table[(crc ^ byte) as usize]);

        if self.reflected {
            crc.reverse_bits()
        } else {
            crc
        }
    }
}

impl Default for Crc8 {
    fn default() -> Self {
        TMC_CRC8.clone()
    }
}

/// Indexed set of CRC tables, one slot per attached device family.
///
/// Slots are filled once at start-up with [`Crc8Bank::init_table`].
#[derive(Debug, Clone)]
pub struct Crc8Bank<const N: usize = CRC_TABLE_COUNT> {
    slots: [Option<Crc8>; N],
}

impl<const N: usize> Default for Crc8Bank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Crc8Bank<N> {
    /// Create a bank with all slots empty.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Fill slot `index` with a table for `polynomial`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below the bank size.
    pub fn init_table(&mut self, polynomial: u8, reflected: bool, index: u8) -> Result<()> {
        let slot = self
            .slots
            .get_mut(index as usize)
            .ok_or(Error::Config(ConfigError::InvalidCrcTable(index)))?;
        *slot = Some(Crc8::new(polynomial, reflected));
        Ok(())
    }

    /// Get the table in slot `index`, if filled.
    pub fn table(&self, index: u8) -> Option<&Crc8> {
        self.slots.get(index as usize).and_then(Option::as_ref)
    }

    /// Checksum `data` with the table in slot `index`.
    ///
    /// An empty or out-of-range slot yields 0.
    pub fn checksum(&self, index: u8, data: &[u8]) -> u8 {
        self.table(index).map(|crc| crc.checksum(data)).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bitwise form of the algorithm from the TMC2209 datasheet.
    fn datasheet_crc(data: &[u8]) -> u8 {
        let mut crc = 0u8;
        for &byte in data {
            let mut current = byte;
            for _ in 0..8 {
                if ((crc >> 7) ^ (current & 0x01)) != 0 {
                    crc = (crc << 1) ^ 0x07;
                } else {
                    crc <<= 1;
                }
                current >>= 1;
            }
        }
        crc
    }

    #[test]
    fn test_known_frames() {
        // read request for IFCNT on slave 0
        assert_eq!(TMC_CRC8.checksum(&[0x05, 0x00, 0x02]), 0x8F);
        // read request for CHOPCONF on slave 3
        assert_eq!(TMC_CRC8.checksum(&[0x05, 0x03, 0x6C]), 0x27);
        // write of IHOLD_IRUN = 0x00071703
        assert_eq!(
            TMC_CRC8.checksum(&[0x05, 0x00, 0x90, 0x00, 0x07, 0x17, 0x03]),
            0x3B
        );
        // reply carrying CHOPCONF = 0x10000053
        assert_eq!(
            TMC_CRC8.checksum(&[0x05, 0xFF, 0x6C, 0x10, 0x00, 0x00, 0x53]),
            0x51
        );
    }

    #[test]
    fn test_matches_datasheet_algorithm() {
        let frames: [&[u8]; 4] = [
            &[0x05, 0x00, 0x00],
            &[0x05, 0xFF, 0x22, 0x00, 0x00, 0x13, 0x88],
            &[0x05, 0x01, 0xEF, 0xDE, 0xAD, 0xBE, 0xEF],
            &[0xFF; 7],
        ];
        for frame in frames {
            assert_eq!(TMC_CRC8.checksum(frame), datasheet_crc(frame));
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(TMC_CRC8.checksum(&[]), 0);
    }

    #[test]
    fn test_non_reflected_table() {
        // plain CRC-8 (poly 0x07) of "123456789" is 0xF4
        let crc = Crc8::new(0x07, false);
        assert_eq!(crc.checksum(b"123456789"), 0xF4);
        assert!(!crc.is_reflected());
    }

    #[test]
    fn test_bank_slots() {
        let mut bank: Crc8Bank = Crc8Bank::new();
        assert_eq!(bank.checksum(1, &[0x05, 0x00, 0x02]), 0);

        bank.init_table(TMC_POLYNOMIAL, true, 1).unwrap();
        assert_eq!(bank.checksum(1, &[0x05, 0x00, 0x02]), 0x8F);
        assert_eq!(bank.checksum(0, &[0x05, 0x00, 0x02]), 0);

        let result = bank.init_table(TMC_POLYNOMIAL, true, 2);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidCrcTable(2)))
        ));
        assert_eq!(bank.checksum(7, &[0x05]), 0);
    }
}
