//! Wire protocol for TMC UART register access.
//!
//! Provides the shared CRC-8, the frame codec and the TMC2209 register map.

pub mod crc;
mod frame;
pub mod registers;

pub use crc::{Crc8, Crc8Bank, TMC_CRC8, TMC_POLYNOMIAL};
pub use frame::{
    Frame, FrameCodec, RegisterAddress, Reply, MASTER_ADDRESS, READ_REQUEST_LEN, REPLY_LEN,
    SYNC, WRITE_BIT, WRITE_FRAME_LEN,
};
pub use registers::{reg, Access, REGISTER_COUNT};
