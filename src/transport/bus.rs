//! Peripheral seams consumed by the transport.

/// Byte-oriented UART peripheral with buffered receive.
///
/// The bus is half-duplex: on single-wire setups every transmitted byte may
/// come back as an echo, which the peripheral is expected to filter.
pub trait UartBus {
    /// Discard everything waiting in the transmit and receive buffers.
    fn clear_buffers(&mut self);

    /// Queue `data` for transmission.
    fn transmit(&mut self, data: &[u8]);

    /// Number of received bytes waiting to be read.
    fn bytes_available(&mut self) -> usize;

    /// Move `buf.len()` received bytes into `buf`.
    ///
    /// Only called after [`UartBus::bytes_available`] reported enough bytes.
    fn receive(&mut self, buf: &mut [u8]);
}

impl<T: UartBus + ?Sized> UartBus for &mut T {
    fn clear_buffers(&mut self) {
        (**self).clear_buffers()
    }

    fn transmit(&mut self, data: &[u8]) {
        (**self).transmit(data)
    }

    fn bytes_available(&mut self) -> usize {
        (**self).bytes_available()
    }

    fn receive(&mut self, buf: &mut [u8]) {
        (**self).receive(buf)
    }
}

/// Monotonic millisecond clock.
pub trait Clock {
    /// Current time in milliseconds. Wraps around on overflow.
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `start`, tolerant of wrap-around.
    #[inline]
    fn elapsed_since(&self, start: u32) -> u32 {
        self.now_ms().wrapping_sub(start)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Clock backed by `std::time::Instant`.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock counting from now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }
}
