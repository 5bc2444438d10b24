//! Simulated TMC2209 and board peripherals shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use tmc2209_uart::protocol::{reg, FrameCodec, RegisterAddress, REGISTER_COUNT, SYNC, WRITE_BIT};
use tmc2209_uart::board::BoardPins;
use tmc2209_uart::{Clock, MotionGenerator, UartBus};

/// How the simulated driver answers read requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// Valid reply.
    Normal,
    /// No reply at all.
    Drop,
    /// Only the first `n` reply bytes.
    Truncate(usize),
    /// Flip the low bit of reply byte `index`.
    Corrupt(usize),
}

/// TMC2209 on the far end of a single-wire UART.
///
/// Decodes request frames, keeps its own register values and answers reads.
/// Frames with a bad checksum or for another slave address are ignored, as
/// the real device does. IFCNT counts accepted writes.
pub struct SimulatedDriver {
    pub address: u8,
    pub registers: [i32; REGISTER_COUNT],
    pub mode: ReplyMode,
    pub frames: Vec<Vec<u8>>,
    codec: FrameCodec,
    rx: Vec<u8>,
}

impl SimulatedDriver {
    pub fn new(address: u8) -> Self {
        let mut registers = [0; REGISTER_COUNT];
        registers[reg::GCONF as usize] = 0x40;
        registers[reg::CHOPCONF as usize] = 0x1000_0053;
        registers[reg::DRV_STATUS as usize] = 0xC000_0000u32 as i32;
        Self {
            address,
            registers,
            mode: ReplyMode::Normal,
            frames: Vec::new(),
            codec: FrameCodec::default(),
            rx: Vec::new(),
        }
    }

    pub fn register(&self, address: u8) -> i32 {
        self.registers[address as usize]
    }

    pub fn write_count(&self) -> i32 {
        self.register(reg::IFCNT)
    }

    fn accept(&self, frame: &[u8]) -> bool {
        if frame.len() < 4 {
            return false;
        }
        let (body, crc) = frame.split_at(frame.len() - 1);
        frame[0] == SYNC
            && frame[1] == self.address
            && self.codec.crc().checksum(body) == crc[0]
    }

    fn answer(&mut self, address: RegisterAddress) {
        let reply = self.codec.encode_reply(address, self.registers[address.index()]);
        let mut bytes = reply.as_bytes().to_vec();
        match self.mode {
            ReplyMode::Normal => {}
            ReplyMode::Drop => bytes.clear(),
            ReplyMode::Truncate(n) => bytes.truncate(n),
            ReplyMode::Corrupt(index) => bytes[index] ^= 0x01,
        }
        self.rx.extend_from_slice(&bytes);
    }
}

impl UartBus for SimulatedDriver {
    fn clear_buffers(&mut self) {
        self.rx.clear();
    }

    fn transmit(&mut self, data: &[u8]) {
        self.frames.push(data.to_vec());
        if !self.accept(data) {
            return;
        }

        match data.len() {
            8 if data[2] & WRITE_BIT != 0 => {
                let address = RegisterAddress::new(data[2]);
                let value = i32::from_be_bytes([data[3], data[4], data[5], data[6]]);
                self.registers[address.index()] = value;
                let count = (self.write_count() + 1) & 0xFF;
                self.registers[reg::IFCNT as usize] = count;
            }
            4 => self.answer(RegisterAddress::new(data[2])),
            _ => {}
        }
    }

    fn bytes_available(&mut self) -> usize {
        self.rx.len()
    }

    fn receive(&mut self, buf: &mut [u8]) {
        let n = buf.len();
        buf.copy_from_slice(&self.rx[..n]);
        self.rx.drain(..n);
    }
}

/// Clock advancing one millisecond per query, so timeouts expire quickly.
#[derive(Default)]
pub struct TickingClock(Cell<u32>);

impl Clock for TickingClock {
    fn now_ms(&self) -> u32 {
        let now = self.0.get();
        self.0.set(now.wrapping_add(1));
        now
    }
}

/// Delay that returns immediately.
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Motion generator that jumps straight to its targets.
#[derive(Debug, Default)]
pub struct InstantMotion {
    pub target_position: i32,
    pub actual_position: i32,
    pub target_velocity: i32,
    pub velocity_max: i32,
    pub acceleration: i32,
    pub move_to_calls: Vec<i32>,
    pub periodic_calls: u32,
}

impl MotionGenerator for InstantMotion {
    fn rotate(&mut self, _motor: u8, velocity: i32) {
        self.target_velocity = velocity;
    }

    fn move_to(&mut self, _motor: u8, position: i32) {
        self.move_to_calls.push(position);
        self.target_position = position;
    }

    fn target_position(&self, _motor: u8) -> i32 {
        self.target_position
    }

    fn actual_position(&self, _motor: u8) -> i32 {
        self.actual_position
    }

    fn set_actual_position(&mut self, _motor: u8, position: i32) {
        self.actual_position = position;
    }

    fn target_velocity(&self, _motor: u8) -> i32 {
        self.target_velocity
    }

    fn actual_velocity(&self, _motor: u8) -> i32 {
        self.target_velocity
    }

    fn velocity_max(&self, _motor: u8) -> i32 {
        self.velocity_max
    }

    fn set_velocity_max(&mut self, _motor: u8, velocity: i32) {
        self.velocity_max = velocity;
    }

    fn acceleration(&self, _motor: u8) -> i32 {
        self.acceleration
    }

    fn set_acceleration(&mut self, _motor: u8, acceleration: i32) {
        self.acceleration = acceleration;
    }

    fn status(&self, _motor: u8) -> i32 {
        i32::from(self.target_velocity != 0)
    }

    fn periodic_job(&mut self, _motor: u8) {
        self.periodic_calls += 1;
        self.actual_position = self.target_position;
    }
}

/// Timer channel recording the last duty cycle.
#[derive(Debug, Default)]
pub struct RecordingPwm {
    pub duty: u16,
}

impl ErrorType for RecordingPwm {
    type Error = Infallible;
}

impl SetDutyCycle for RecordingPwm {
    fn max_duty_cycle(&self) -> u16 {
        100
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

/// Output pin whose level can be observed through a cloned handle.
#[derive(Debug, Clone, Default)]
pub struct SharedPin(Rc<Cell<bool>>);

impl SharedPin {
    pub fn is_high(&self) -> bool {
        self.0.get()
    }
}

impl embedded_hal::digital::ErrorType for SharedPin {
    type Error = Infallible;
}

impl OutputPin for SharedPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(true);
        Ok(())
    }
}

/// Board pins plus an observer handle on ENN.
pub fn shared_pins() -> (BoardPins<SharedPin>, SharedPin) {
    let enn = SharedPin::default();
    let pins = BoardPins::new(
        enn.clone(),
        SharedPin::default(),
        SharedPin::default(),
        SharedPin::default(),
        SharedPin::default(),
        SharedPin::default(),
    )
    .expect("shared pins are infallible");
    (pins, enn)
}
