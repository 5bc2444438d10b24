//! Drive a TMC2209 board against an in-process driver simulation.
//!
//! Run with `cargo run --example simulated_board`.

use std::convert::Infallible;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};
use tmc2209_uart::board::{BoardPins, Channel, DriverState, Tmc2209Board};
use tmc2209_uart::protocol::{reg, FrameCodec, RegisterAddress, REGISTER_COUNT, WRITE_BIT};
use tmc2209_uart::register::ConfigState;
use tmc2209_uart::transport::StdClock;
use tmc2209_uart::{parse_config, MotionGenerator, RegisterEngine, UartBus};

const CONFIG: &str = r#"
driver_enable = true

[channels.ch2]
slave_address = 0
timeout_ms = 10
settle_ms = 1
velocity_max = 51200
acceleration = 51200
"#;

/// Driver at the other end of the wire; answers every valid request.
struct LoopbackDriver {
    address: u8,
    registers: [i32; REGISTER_COUNT],
    codec: FrameCodec,
    rx: Vec<u8>,
}

impl UartBus for LoopbackDriver {
    fn clear_buffers(&mut self) {
        self.rx.clear();
    }

    fn transmit(&mut self, data: &[u8]) {
        let Some((crc, body)) = data.split_last() else {
            return;
        };
        if body.len() < 3 || body[1] != self.address || self.codec.crc().checksum(body) != *crc {
            return;
        }

        let address = RegisterAddress::new(data[2]);
        if data[2] & WRITE_BIT != 0 && body.len() == 7 {
            self.registers[address.index()] = i32::from_be_bytes([body[3], body[4], body[5], body[6]]);
            self.registers[reg::IFCNT as usize] += 1;
        } else if body.len() == 3 {
            let reply = self.codec.encode_reply(address, self.registers[address.index()]);
            self.rx.extend_from_slice(reply.as_bytes());
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

struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

/// Step generator that prints what it is asked to do.
#[derive(Default)]
struct PrintingMotion {
    position: i32,
    target: i32,
    velocity: i32,
    velocity_max: i32,
    acceleration: i32,
}

impl MotionGenerator for PrintingMotion {
    fn rotate(&mut self, motor: u8, velocity: i32) {
        println!("  motor {motor}: rotate at {velocity}");
        self.velocity = velocity;
    }

    fn move_to(&mut self, motor: u8, position: i32) {
        println!("  motor {motor}: move to {position}");
        self.target = position;
    }

    fn target_position(&self, _motor: u8) -> i32 {
        self.target
    }

    fn actual_position(&self, _motor: u8) -> i32 {
        self.position
    }

    fn set_actual_position(&mut self, _motor: u8, position: i32) {
        self.position = position;
    }

    fn target_velocity(&self, _motor: u8) -> i32 {
        self.velocity
    }

    fn actual_velocity(&self, _motor: u8) -> i32 {
        self.velocity
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
        i32::from(self.position != self.target)
    }

    fn periodic_job(&mut self, _motor: u8) {
        self.position = self.target;
    }
}

struct ConsolePin(&'static str);

impl PinErrorType for ConsolePin {
    type Error = Infallible;
}

impl OutputPin for ConsolePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        println!("  pin {} low", self.0);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        println!("  pin {} high", self.0);
        Ok(())
    }
}

struct ConsolePwm;

impl PwmErrorType for ConsolePwm {
    type Error = Infallible;
}

impl SetDutyCycle for ConsolePwm {
    fn max_duty_cycle(&self) -> u16 {
        1000
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        println!("  uc_pwm duty {duty}/1000");
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let system = parse_config(CONFIG)?;
    let channel = system.require_channel("ch2")?;

    let driver = LoopbackDriver {
        address: channel.slave_address,
        registers: [0; REGISTER_COUNT],
        codec: FrameCodec::default(),
        rx: Vec::new(),
    };
    let registers = RegisterEngine::from_config(driver, StdClock::new(), SleepDelay, channel);

    println!("init pins");
    let pins = BoardPins::new(
        ConsolePin("ENN"),
        ConsolePin("SPREAD"),
        ConsolePin("MS1_AD0"),
        ConsolePin("MS2_AD1"),
        ConsolePin("UC_PWM"),
        ConsolePin("STDBY"),
    )?;

    println!("build board");
    let mut board = Tmc2209Board::builder()
        .from_channel_config(channel)
        .generator(PrintingMotion::default())
        .registers(registers)
        .pins(pins)
        .pwm(ConsolePwm)
        .build(&system)?;

    let mut tick = 0;
    while board.dispatch().registers().config_state() != ConfigState::Ready {
        board.periodic_job(tick);
        tick += 1;
    }
    println!(
        "power-on configuration pushed in {tick} ticks, IFCNT = {}",
        board.read_register(RegisterAddress::new(reg::IFCNT))
    );
    println!(
        "CHOPCONF = {:#010x}",
        board.read_register(RegisterAddress::new(reg::CHOPCONF))
    );

    println!("parameters");
    board.set_parameter(4, 0, -100_000)?;
    println!("  max velocity reads back {}", board.get_parameter(4, 0)?);
    board.set_parameter(1, 0, 1000)?;
    let target = board.move_by(0, 250)?;
    board.periodic_job(tick);
    println!("  moved to {target}, actual {}", board.get_parameter(1, 0)?);

    if let Err(e) = board.set_parameter(3, 0, 10) {
        println!("  actual velocity write rejected: {e}");
    }

    println!("user functions");
    board.user_function(4, 0, 30)?;
    board.user_function(5, 1, 1)?;
    println!("  SPREAD state {}", board.user_function(6, 1, 0)?);

    println!("health");
    board.observe_supply(24);
    println!("  flags {:#06b}", board.check_errors(tick).bits());
    println!("  flags {:#06b}", board.check_errors(tick + 1).bits());

    println!("shutdown");
    board.enable_driver(DriverState::Disabled, &system)?;
    board.deinit()?;

    Ok(())
}
