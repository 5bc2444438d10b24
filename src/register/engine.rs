//! Register engine: 32-bit register access over the UART transport.

use embedded_hal::delay::DelayNs;

use crate::config::ChannelConfig;
use crate::error::BusError;
use crate::protocol::{FrameCodec, RegisterAddress, REPLY_LEN};
use crate::transport::{Clock, ExchangeResult, UartBus, UartTransport};

use super::shadow::{ConfigState, RegisterFile};
use super::RegisterSpace;

/// Value returned by a lenient read when the device did not answer correctly.
pub const UNKNOWN_VALUE: i32 = 0;

/// Register access for one device on the bus.
///
/// Owns the transport, so only one exchange can be in flight at a time.
/// Mirrors every written value in a [`RegisterFile`]; registers the device
/// cannot report are answered from that mirror.
pub struct RegisterEngine<BUS, CLOCK, DELAY>
where
    BUS: UartBus,
    CLOCK: Clock,
    DELAY: DelayNs,
{
    transport: UartTransport<BUS, CLOCK, DELAY>,
    codec: FrameCodec,
    slave_address: u8,
    registers: RegisterFile,
    last_fault: Option<BusError>,
}

impl<BUS, CLOCK, DELAY> RegisterEngine<BUS, CLOCK, DELAY>
where
    BUS: UartBus,
    CLOCK: Clock,
    DELAY: DelayNs,
{
    /// Create an engine talking to device `slave_address`.
    pub fn new(transport: UartTransport<BUS, CLOCK, DELAY>, slave_address: u8) -> Self {
        Self {
            transport,
            codec: FrameCodec::default(),
            slave_address,
            registers: RegisterFile::new(),
            last_fault: None,
        }
    }

    /// Create an engine with the timing, checksum and slave address of a
    /// channel configuration.
    pub fn from_config(bus: BUS, clock: CLOCK, delay: DELAY, config: &ChannelConfig) -> Self {
        let transport = UartTransport::new(bus, clock, delay)
            .with_timing(config.timeout_ms, config.settle_ms);
        Self::new(transport, config.slave_address).with_codec(config.codec())
    }

    /// Use a different frame codec (e.g. another checksum table).
    pub fn with_codec(mut self, codec: FrameCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Use a different register file.
    pub fn with_register_file(mut self, registers: RegisterFile) -> Self {
        self.registers = registers;
        self
    }

    /// The local register mirror.
    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// The transport.
    pub fn transport_mut(&mut self) -> &mut UartTransport<BUS, CLOCK, DELAY> {
        &mut self.transport
    }

    /// Give back the transport.
    pub fn release(self) -> UartTransport<BUS, CLOCK, DELAY> {
        self.transport
    }

    /// Read a register, reporting bus faults.
    ///
    /// Registers without read access are answered from the local mirror
    /// without a bus exchange.
    ///
    /// # Errors
    ///
    /// Returns a [`BusError`] if the reply times out, is damaged, or belongs
    /// to another register.
    pub fn try_read_register(&mut self, address: RegisterAddress) -> core::result::Result<i32, BusError> {
        if !self.registers.access(address).is_readable() {
            return Ok(self.registers.value(address));
        }

        let request = self.codec.encode_read_request(self.slave_address, address);
        let reply = match self.transport.exchange(request.as_bytes(), REPLY_LEN) {
            ExchangeResult::Received(bytes) => self.codec.decode_reply(&bytes)?,
            ExchangeResult::TimedOut => return Err(BusError::TimedOut),
            ExchangeResult::Written => return Err(BusError::ShortFrame(0)),
            ExchangeResult::TooLong(len) => return Err(BusError::ReplyTooLong(len)),
        };

        if reply.address != address {
            return Err(BusError::AddressMismatch {
                expected: address.value(),
                received: reply.address.value(),
            });
        }

        Ok(reply.value)
    }

    /// Current configuration push state.
    pub fn config_state(&self) -> ConfigState {
        self.registers.state()
    }
}

impl<BUS, CLOCK, DELAY> RegisterSpace for RegisterEngine<BUS, CLOCK, DELAY>
where
    BUS: UartBus,
    CLOCK: Clock,
    DELAY: DelayNs,
{
    fn write_register(&mut self, address: RegisterAddress, value: i32) {
        let frame = self.codec.encode_write(self.slave_address, address, value);
        self.transport.exchange(frame.as_bytes(), 0);
        self.registers.record_write(address, value);
    }

    fn read_register(&mut self, address: RegisterAddress) -> i32 {
        match self.try_read_register(address) {
            Ok(value) => value,
            Err(e) => {
                warn!("register {} read failed: {}", address.value(), e);
                self.last_fault = Some(e);
                UNKNOWN_VALUE
            }
        }
    }

    fn slave_address(&self) -> u8 {
        self.slave_address
    }

    fn set_slave_address(&mut self, address: u8) {
        debug!("slave address {} -> {}", self.slave_address, address);
        self.slave_address = address;
    }

    fn reset(&mut self) -> bool {
        self.registers.begin_reset()
    }

    fn restore(&mut self) -> bool {
        self.registers.begin_restore()
    }

    fn periodic_job(&mut self, _tick: u32) {
        if let Some((address, value)) = self.registers.next_pending_write() {
            self.write_register(address, value);
        }
    }

    fn take_fault(&mut self) -> Option<BusError> {
        self.last_fault.take()
    }
}
