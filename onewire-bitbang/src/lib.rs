#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

/*! # onewire-bitbang
 *
 * A 1-Wire bus master that generates every reset pulse and time slot by
 * toggling one GPIO line and busy-waiting between edges.
 *
 * The slot timing is only as good as the delay provider and the scheduling
 * around it: run bus operations with interrupts disabled, or at least with
 * preemption bounded to a few microseconds.
 */

pub use embedded_onewire::{OneWire, OneWireError, OneWireResult};
mod error;
mod onewire;
mod pin;
mod timing;

pub use error::BitBangError;
pub use onewire::Presence;
pub use pin::{BusPin, OpenDrain};
pub use timing::SlotTiming;

/// A bit-banged 1-Wire bus master.
///
/// Takes ownership of a bus line (implementing [`BusPin`])
/// and a timer object implementing the [`DelayNs`](embedded_hal::delay::DelayNs) trait.
#[derive(Debug)]
pub struct BitBang<P, D> {
    pub(crate) pin: P,
    pub(crate) delay: D,
    pub(crate) timing: SlotTiming,
}

/// Builder for creating a [`BitBang`] instance with custom configuration.
#[derive(Debug, Default)]
pub struct BitBangBuilder {
    pub(crate) timing: SlotTiming,
}

impl BitBangBuilder {
    /// Sets the slot timing.
    pub fn with_timing(mut self, timing: SlotTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Builds a new [`BitBang`] instance and releases the bus.
    ///
    /// # Errors
    /// [`BitBangError::InvalidTiming`] if the slot timing would violate the
    /// 1-Wire sampling windows, [`BitBangError::Pin`] on GPIO errors.
    pub fn build<P: BusPin, D>(
        self,
        mut pin: P,
        delay: D,
    ) -> Result<BitBang<P, D>, BitBangError<P::Error>> {
        if let Err(reason) = self.timing.validate() {
            return Err(BitBangError::InvalidTiming(reason));
        }
        pin.set_high()?;
        pin.configure_output()?;
        log::debug!("1-Wire bit-bang master ready: {:?}", self.timing);
        Ok(BitBang {
            pin,
            delay,
            timing: self.timing,
        })
    }
}

impl<P: BusPin, D> BitBang<P, D> {
    /// Creates a bus master with the default slot timing.
    pub fn new(pin: P, delay: D) -> Result<Self, BitBangError<P::Error>> {
        BitBangBuilder::default().build(pin, delay)
    }
}

impl<P, D> BitBang<P, D> {
    /// Slot timing in use.
    pub fn timing(&self) -> &SlotTiming {
        &self.timing
    }

    /// Gives back the bus line and the delay provider.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}
