//! Integration tests for tmc2209-uart.
//!
//! These tests drive the full stack, from TOML configuration down to frames on
//! the wire, against a simulated TMC2209.

mod common;

use common::{
    shared_pins, InstantMotion, NoDelay, RecordingPwm, ReplyMode, SharedPin, SimulatedDriver,
    TickingClock,
};
use tmc2209_uart::board::{Channel, DriverState, ErrorFlags, Tmc2209Board};
use tmc2209_uart::config::{parse_config, SystemConfig};
use tmc2209_uart::error::{BusError, Error, ParamError};
use tmc2209_uart::protocol::{reg, RegisterAddress};
use tmc2209_uart::register::{ConfigState, RegisterEngine, RegisterSpace};
use tmc2209_uart::transport::{ExchangeResult, UartBus, UartTransport};
use tmc2209_uart::LogicalParameter;

type Engine = RegisterEngine<SimulatedDriver, TickingClock, NoDelay>;
type Board = Tmc2209Board<InstantMotion, Engine, SharedPin, RecordingPwm>;

// =============================================================================
// Test configuration data
// =============================================================================

const BOARD_CONFIG: &str = r#"
driver_enable = true

[channels.ch2]
slave_address = 0
timeout_ms = 10
settle_ms = 2
velocity_max = 80000
acceleration = 40000
"#;

fn engine(driver: SimulatedDriver, slave_address: u8) -> Engine {
    RegisterEngine::new(
        UartTransport::new(driver, TickingClock::default(), NoDelay),
        slave_address,
    )
}

fn board(system: &SystemConfig) -> (Board, SharedPin) {
    let channel = system.require_channel("ch2").expect("channel exists");
    let registers = RegisterEngine::from_config(
        SimulatedDriver::new(channel.slave_address),
        TickingClock::default(),
        NoDelay,
        channel,
    );
    let (pins, enn) = shared_pins();

    let board = Tmc2209Board::builder()
        .from_channel_config(channel)
        .generator(InstantMotion::default())
        .registers(registers)
        .pins(pins)
        .pwm(RecordingPwm::default())
        .build(system)
        .expect("board builds");
    (board, enn)
}

fn driver(board: &mut Board) -> &mut SimulatedDriver {
    board.dispatch_mut().registers_mut().transport_mut().bus_mut()
}

fn settle_config(board: &mut Board) {
    let mut tick = 0;
    while board.dispatch().registers().config_state() != ConfigState::Ready {
        board.periodic_job(tick);
        tick += 1;
        assert!(tick < 200, "configuration push did not finish");
    }
}

// =============================================================================
// Transport
// =============================================================================

#[test]
fn test_write_only_exchange_returns_written() {
    let mut transport = UartTransport::new(SimulatedDriver::new(0), TickingClock::default(), NoDelay);
    let frame = [0x05, 0x00, 0x90, 0x00, 0x07, 0x17, 0x03, 0x3B];

    assert_eq!(transport.exchange(&frame, 0), ExchangeResult::Written);
    assert_eq!(transport.bus_mut().register(reg::IHOLD_IRUN), 0x0007_1703);
}

#[test]
fn test_partial_reply_times_out_and_stays_buffered() {
    let mut engine = engine(SimulatedDriver::new(0), 0);
    engine.transport_mut().bus_mut().mode = ReplyMode::Truncate(5);

    assert_eq!(
        engine.try_read_register(RegisterAddress::new(reg::CHOPCONF)),
        Err(BusError::TimedOut)
    );
    assert_eq!(engine.transport_mut().bus_mut().bytes_available(), 5);

    // the next exchange clears the stale bytes before transmitting
    engine.transport_mut().bus_mut().mode = ReplyMode::Normal;
    assert_eq!(
        engine.try_read_register(RegisterAddress::new(reg::CHOPCONF)),
        Ok(0x1000_0053)
    );
}

// =============================================================================
// Register engine against the simulated driver
// =============================================================================

#[test]
fn test_write_then_read_back() {
    let mut engine = engine(SimulatedDriver::new(0), 0);
    let chopconf = RegisterAddress::new(reg::CHOPCONF);

    engine.write_register(chopconf, 0x1500_0053);
    assert_eq!(engine.read_register(chopconf), 0x1500_0053);
    assert_eq!(engine.read_register(RegisterAddress::new(reg::IFCNT)), 1);
    assert_eq!(engine.take_fault(), None);
}

#[test]
fn test_dropped_reply_is_lenient() {
    let mut engine = engine(SimulatedDriver::new(0), 0);
    engine.transport_mut().bus_mut().mode = ReplyMode::Drop;

    assert_eq!(engine.read_register(RegisterAddress::new(reg::GCONF)), 0);
    assert_eq!(engine.take_fault(), Some(BusError::TimedOut));
}

#[test]
fn test_every_corrupted_reply_byte_is_detected() {
    for index in 0..8 {
        let mut engine = engine(SimulatedDriver::new(0), 0);
        engine.transport_mut().bus_mut().mode = ReplyMode::Corrupt(index);

        let result = engine.try_read_register(RegisterAddress::new(reg::DRV_STATUS));
        assert!(
            matches!(result, Err(BusError::ChecksumMismatch { .. })),
            "byte {} not detected: {:?}",
            index,
            result
        );
    }
}

#[test]
fn test_frames_for_other_slaves_are_ignored() {
    let mut engine = engine(SimulatedDriver::new(1), 0);
    assert_eq!(
        engine.try_read_register(RegisterAddress::new(reg::GCONF)),
        Err(BusError::TimedOut)
    );

    engine.set_slave_address(1);
    assert_eq!(engine.try_read_register(RegisterAddress::new(reg::GCONF)), Ok(0x40));
}

#[test]
fn test_write_only_register_never_reaches_the_bus_on_read() {
    let mut engine = engine(SimulatedDriver::new(0), 0);
    engine.write_register(RegisterAddress::new(reg::IHOLD_IRUN), 0x0001_0A05);
    let frames = engine.transport_mut().bus_mut().frames.len();

    assert_eq!(engine.read_register(RegisterAddress::new(reg::IHOLD_IRUN)), 0x0001_0A05);
    assert_eq!(engine.transport_mut().bus_mut().frames.len(), frames);
}

// =============================================================================
// Board workflow
// =============================================================================

#[test]
fn test_board_from_toml() {
    let system = parse_config(BOARD_CONFIG).expect("config parses");
    let (board, enn) = board(&system);

    assert!(!enn.is_high(), "driver should be enabled");
    assert_eq!(board.dispatch().generator().velocity_max, 80000);
    assert_eq!(board.dispatch().generator().acceleration, 40000);
    assert_eq!(board.number_of_motors(), 1);
}

#[test]
fn test_power_on_configuration_push() {
    let system = parse_config(BOARD_CONFIG).expect("config parses");
    let (mut board, _enn) = board(&system);

    settle_config(&mut board);
    let driver = driver(&mut board);
    assert_eq!(driver.register(reg::IHOLD_IRUN), 0x0007_1703);
    assert_eq!(driver.register(reg::PWMCONF), 0xC10D_0024u32 as i32);
    assert!(driver.write_count() > 0);
}

#[test]
fn test_restore_after_driver_power_loss() {
    let system = parse_config(BOARD_CONFIG).expect("config parses");
    let (mut board, _enn) = board(&system);
    settle_config(&mut board);

    board.write_register(RegisterAddress::new(reg::CHOPCONF), 0x1400_0053);
    *driver(&mut board) = SimulatedDriver::new(0);

    assert!(board.restore());
    assert!(!board.reset(), "push already running");
    settle_config(&mut board);

    let driver = driver(&mut board);
    assert_eq!(driver.register(reg::CHOPCONF), 0x1400_0053);
    assert_eq!(driver.register(reg::IHOLD_IRUN), 0x0007_1703);
}

#[test]
fn test_parameters_through_board() {
    let system = parse_config(BOARD_CONFIG).expect("config parses");
    let (mut board, _enn) = board(&system);

    board
        .dispatch_mut()
        .set(LogicalParameter::MaxVelocity, 0, -500)
        .unwrap();
    assert_eq!(board.get_parameter(4, 0).unwrap(), 500);

    assert_eq!(
        board.get_parameter(0, board.number_of_motors()),
        Err(Error::Param(ParamError::InvalidMotor(1)))
    );
    assert_eq!(
        board.set_parameter(3, 0, 100),
        Err(Error::Param(ParamError::UnsupportedOperation))
    );
    assert_eq!(
        board.set_parameter(9, 0, 100),
        Err(Error::Param(ParamError::UnknownParameter(9)))
    );
}

#[test]
fn test_move_by_targets_actual_plus_delta() {
    let system = parse_config(BOARD_CONFIG).expect("config parses");
    let (mut board, _enn) = board(&system);

    board.set_parameter(1, 0, 1000).unwrap();
    assert_eq!(board.move_by(0, 250).unwrap(), 1250);
    assert_eq!(board.dispatch().generator().move_to_calls, [1250]);
    assert_eq!(board.get_parameter(0, 0).unwrap(), 1250);

    board.periodic_job(0);
    assert_eq!(board.get_parameter(1, 0).unwrap(), 1250);
}

#[test]
fn test_velocity_commands() {
    let system = parse_config(BOARD_CONFIG).expect("config parses");
    let (mut board, _enn) = board(&system);

    board.right(0, 2000).unwrap();
    assert_eq!(board.get_parameter(2, 0).unwrap(), 2000);
    board.left(0, 2000).unwrap();
    assert_eq!(board.get_parameter(2, 0).unwrap(), -2000);
    board.stop(0).unwrap();
    assert_eq!(board.get_parameter(2, 0).unwrap(), 0);
}

#[test]
fn test_slave_address_parameter_redirects_frames() {
    let system = parse_config(BOARD_CONFIG).expect("config parses");
    let (mut board, _enn) = board(&system);
    driver(&mut board).address = 2;

    assert_eq!(board.read_register(RegisterAddress::new(reg::GCONF)), 0);

    board.set_parameter(6, 0, 2).unwrap();
    assert_eq!(board.user_function(2, 0, 0).unwrap(), 2);
    assert_eq!(board.read_register(RegisterAddress::new(reg::GCONF)), 0x40);
}

// =============================================================================
// Driver enable and health
// =============================================================================

#[test]
fn test_enable_driver_against_global_flag() {
    let mut system = parse_config(BOARD_CONFIG).expect("config parses");
    let (mut board, enn) = board(&system);
    assert!(!enn.is_high());

    board.enable_driver(DriverState::Disabled, &system).unwrap();
    assert!(enn.is_high());

    system.driver_enable = false;
    board.enable_driver(DriverState::Enabled, &system).unwrap();
    assert!(enn.is_high(), "global disable wins");

    system.driver_enable = true;
    board.enable_driver(DriverState::FollowGlobal, &system).unwrap();
    assert!(!enn.is_high());
}

#[test]
fn test_health_flags_are_level_triggered() {
    let system = parse_config(BOARD_CONFIG).expect("config parses");
    let (mut board, _enn) = board(&system);

    driver(&mut board).mode = ReplyMode::Drop;
    board.read_register(RegisterAddress::new(reg::DRV_STATUS));
    board.observe_supply(30);
    assert_eq!(
        board.errors(),
        ErrorFlags::BUS | ErrorFlags::VM | ErrorFlags::VM_UNDER
    );

    board.check_errors(1);
    assert!(board.errors().is_empty());
    board.check_errors(2);
    assert!(board.errors().is_empty());
}

#[test]
fn test_pwm_duty_user_function() {
    let system = parse_config(BOARD_CONFIG).expect("config parses");
    let (mut board, _enn) = board(&system);

    board.user_function(4, 0, 40).unwrap();
    board.user_function(4, 0, -10).unwrap();
    let (_, _, _, pwm) = board.release();
    assert_eq!(pwm.duty, 0);
}

#[test]
fn test_deinit_disables_driver() {
    let system = parse_config(BOARD_CONFIG).expect("config parses");
    let (mut board, enn) = board(&system);

    board.deinit().unwrap();
    assert!(enn.is_high());
}
