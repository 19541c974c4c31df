use embedded_hal::delay::DelayNs;
use std::time::{Duration, Instant};

/// Busy-waiting delay for bus slot timing.
///
/// `linux_embedded_hal::Delay` sleeps, and a sleeping thread wakes up
/// tens to hundreds of microseconds late; a 1-Wire read slot has to be
/// sampled within 15 µs of its falling edge.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinDelay;

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let deadline = Instant::now() + Duration::from_nanos(u64::from(ns));
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
    }
}
