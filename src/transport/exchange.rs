//! Blocking write-then-read exchange with a bounded reply wait.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use super::bus::{Clock, UartBus};

/// Default reply timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u32 = 10;

/// Default turnaround delay after transmitting, in milliseconds.
pub const DEFAULT_SETTLE_MS: u32 = 2;

/// Largest reply a single exchange can return.
pub const MAX_EXCHANGE_LEN: usize = 16;

/// Outcome of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeResult {
    /// Bytes were written and no reply was requested.
    Written,
    /// The requested number of reply bytes arrived.
    Received(Vec<u8, MAX_EXCHANGE_LEN>),
    /// The reply did not complete in time. Nothing was consumed from the bus.
    TimedOut,
    /// The requested reply length exceeds [`MAX_EXCHANGE_LEN`]. Nothing was transmitted.
    TooLong(usize),
}

/// Half-duplex UART transport.
///
/// Each call to [`UartTransport::exchange`] owns the bus for its whole
/// duration: it clears stale input, writes the request, waits out the bus
/// turnaround and then polls for the reply until it completes or the timeout
/// elapses. `&mut self` keeps a second exchange from starting before the
/// first has finished.
///
/// Generic over:
/// - `BUS`: UART peripheral (must implement [`UartBus`])
/// - `CLOCK`: millisecond clock (must implement [`Clock`])
/// - `DELAY`: delay provider for the turnaround wait (must implement `DelayNs`)
pub struct UartTransport<BUS, CLOCK, DELAY>
where
    BUS: UartBus,
    CLOCK: Clock,
    DELAY: DelayNs,
{
    bus: BUS,
    clock: CLOCK,
    delay: DELAY,
    timeout_ms: u32,
    settle_ms: u32,
}

impl<BUS, CLOCK, DELAY> UartTransport<BUS, CLOCK, DELAY>
where
    BUS: UartBus,
    CLOCK: Clock,
    DELAY: DelayNs,
{
    /// Create a transport with the default timing.
    pub fn new(bus: BUS, clock: CLOCK, delay: DELAY) -> Self {
        Self {
            bus,
            clock,
            delay,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    /// Override the reply timeout and turnaround delay.
    pub fn with_timing(mut self, timeout_ms: u32, settle_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self.settle_ms = settle_ms;
        self
    }

    /// Reply timeout in milliseconds.
    #[inline]
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Turnaround delay in milliseconds.
    #[inline]
    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Access the underlying bus.
    pub fn bus_mut(&mut self) -> &mut BUS {
        &mut self.bus
    }

    /// Access the clock.
    pub fn clock(&self) -> &CLOCK {
        &self.clock
    }

    /// Give back the peripherals.
    pub fn release(self) -> (BUS, CLOCK, DELAY) {
        (self.bus, self.clock, self.delay)
    }

    /// Exchange with the configured timeout.
    ///
    /// See [`UartTransport::exchange_with_timeout`].
    pub fn exchange(&mut self, request: &[u8], read_len: usize) -> ExchangeResult {
        self.exchange_with_timeout(request, read_len, self.timeout_ms)
    }

    /// Write `request` and, if `read_len > 0`, wait for `read_len` reply bytes.
    ///
    /// The turnaround delay is spent before the timeout starts counting.
    /// A `read_len` above [`MAX_EXCHANGE_LEN`] is refused before the bus is touched.
    pub fn exchange_with_timeout(
        &mut self,
        request: &[u8],
        read_len: usize,
        timeout_ms: u32,
    ) -> ExchangeResult {
        if read_len > MAX_EXCHANGE_LEN {
            warn!("uart reply of {} bytes exceeds {}", read_len, MAX_EXCHANGE_LEN);
            return ExchangeResult::TooLong(read_len);
        }

        self.bus.clear_buffers();
        self.bus.transmit(request);

        // Let the request leave the wire before anything else may clear the buffers.
        self.delay.delay_ms(self.settle_ms);

        if read_len == 0 {
            return ExchangeResult::Written;
        }
        let start = self.clock.now_ms();
        while self.bus.bytes_available() < read_len {
            if self.clock.elapsed_since(start) > timeout_ms {
                warn!(
                    "uart reply timed out: {} of {} bytes",
                    self.bus.bytes_available(),
                    read_len
                );
                return ExchangeResult::TimedOut;
            }
        }

        let mut reply = Vec::new();
        if reply.resize(read_len, 0).is_err() {
            return ExchangeResult::TooLong(read_len);
        }
        self.bus.receive(&mut reply);

        trace!("uart exchange: {} bytes out, {} bytes in", request.len(), read_len);
        ExchangeResult::Received(reply)
    }
}
