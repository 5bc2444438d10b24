//! UART datagram encoding and reply validation.
//!
//! Three frame shapes cross the bus:
//!
//! | frame        | bytes                                              |
//! |--------------|----------------------------------------------------|
//! | write        | `SYNC, slave, addr \| 0x80, value (BE, 4), crc`    |
//! | read request | `SYNC, slave, addr, crc`                           |
//! | read reply   | `SYNC, 0xFF, addr, value (BE, 4), crc`             |

use crate::error::BusError;

use super::crc::Crc8;

/// Sync byte (sync nibble plus reserved bits) opening every frame.
pub const SYNC: u8 = 0x05;

/// Address carried by replies, which are always sent to the master.
pub const MASTER_ADDRESS: u8 = 0xFF;

/// Flag set in the register byte of write frames.
pub const WRITE_BIT: u8 = 0x80;

/// Length of a write frame.
pub const WRITE_FRAME_LEN: usize = 8;

/// Length of a read request frame.
pub const READ_REQUEST_LEN: usize = 4;

/// Length of a read reply frame.
pub const REPLY_LEN: usize = 8;

/// 7-bit register address.
///
/// The top bit of the transmitted byte carries the read/write intent and is
/// never part of the logical address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterAddress(u8);

impl RegisterAddress {
    /// Create an address, dropping the read/write bit.
    #[inline]
    pub const fn new(raw: u8) -> Self {
        Self(raw & !WRITE_BIT)
    }

    /// Get the 7-bit address.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Index into a register table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Register byte as transmitted in a write frame.
    #[inline]
    pub const fn write_byte(self) -> u8 {
        self.0 | WRITE_BIT
    }
}

impl From<u8> for RegisterAddress {
    fn from(raw: u8) -> Self {
        Self::new(raw)
    }
}

/// An encoded frame ready for transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; WRITE_FRAME_LEN],
    len: usize,
}

impl Frame {
    /// Frame bytes including the checksum.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Frame length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the frame holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A validated read reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    /// Register the reply belongs to.
    pub address: RegisterAddress,
    /// Register value.
    pub value: i32,
}

/// Encoder/decoder for register access frames.
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    crc: Crc8,
}

impl FrameCodec {
    /// Create a codec checksumming with `crc`.
    pub fn new(crc: Crc8) -> Self {
        Self { crc }
    }

    /// The checksum table in use.
    #[inline]
    pub fn crc(&self) -> &Crc8 {
        &self.crc
    }

    /// Encode a write of `value` to `address` on device `slave`.
    pub fn encode_write(&self, slave: u8, address: RegisterAddress, value: i32) -> Frame {
        let mut bytes = [0u8; WRITE_FRAME_LEN];
        bytes[0] = SYNC;
        bytes[1] = slave;
        bytes[2] = address.write_byte();
        bytes[3..7].copy_from_slice(&value.to_be_bytes());
        bytes[7] = self.crc.checksum(&bytes[..7]);

        Frame {
            bytes,
            len: WRITE_FRAME_LEN,
        }
    }

    /// Encode a read request for `address` on device `slave`.
    pub fn encode_read_request(&self, slave: u8, address: RegisterAddress) -> Frame {
        let mut bytes = [0u8; WRITE_FRAME_LEN];
        bytes[0] = SYNC;
        bytes[1] = slave;
        bytes[2] = address.value();
        bytes[3] = self.crc.checksum(&bytes[..3]);

        Frame {
            bytes,
            len: READ_REQUEST_LEN,
        }
    }

    /// Validate and decode a read reply.
    ///
    /// The checksum is checked before any field is interpreted. The read/write
    /// bit of the echoed address is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`BusError`] for short frames, checksum mismatches, a wrong
    /// sync byte, or a reply not addressed to the master.
    pub fn decode_reply(&self, bytes: &[u8]) -> core::result::Result<Reply, BusError> {
        if bytes.len() < REPLY_LEN {
            return Err(BusError::ShortFrame(bytes.len()));
        }
        let bytes = &bytes[..REPLY_LEN];

        let expected = self.crc.checksum(&bytes[..REPLY_LEN - 1]);
        let received = bytes[REPLY_LEN - 1];
        if expected != received {
            return Err(BusError::ChecksumMismatch { expected, received });
        }

        if bytes[0] != SYNC {
            return Err(BusError::InvalidSync(bytes[0]));
        }
        if bytes[1] != MASTER_ADDRESS {
            return Err(BusError::InvalidMasterAddress(bytes[1]));
        }

        Ok(Reply {
            address: RegisterAddress::new(bytes[2]),
            value: i32::from_be_bytes([bytes[3], bytes[4], bytes[5], bytes[6]]),
        })
    }

    /// Encode a reply frame as the device would send it.
    ///
    /// Used by device simulators and loopback tests.
    pub fn encode_reply(&self, address: RegisterAddress, value: i32) -> Frame {
        let mut bytes = [0u8; REPLY_LEN];
        bytes[0] = SYNC;
        bytes[1] = MASTER_ADDRESS;
        bytes[2] = address.value();
        bytes[3..7].copy_from_slice(&value.to_be_bytes());
        bytes[7] = self.crc.checksum(&bytes[..7]);

        Frame {
            bytes,
            len: REPLY_LEN,
        }
    }
}
