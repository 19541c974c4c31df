use crate::{OneWire, OneWireStatus, consts::ONEWIRE_SEARCH_CMD, error::OneWireError};

/// Number of bits in a ROM code.
const ROM_BITS: u8 = 64;

/// State carried from one ROM search step to the next.
///
/// The search walks the 64 ROM bits from bit 0 (least significant bit of
/// byte 0) upwards. Whenever responding devices disagree on a bit, the
/// search writes a zero and remembers the position. The next step retraces
/// the previous address up to the highest such position, writes a one
/// there, and zeros on every new disagreement after it. When a step sees no
/// disagreement resolved to zero, every device has been visited.
///
/// A fresh state starts a new enumeration session. It must be owned by the
/// one caller driving that session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    last_zero_branch: Option<u8>,
    done: bool,
    address: [u8; 8],
}

impl SearchState {
    /// Creates a zeroed search state with no recorded branch.
    pub const fn new() -> Self {
        Self {
            last_zero_branch: None,
            done: false,
            address: [0; 8],
        }
    }

    /// Highest bit position where the last successful step resolved a
    /// disagreement to zero, or [`None`] before the first such step.
    pub fn last_zero_branch(&self) -> Option<u8> {
        self.last_zero_branch
    }

    /// Whether the enumeration is exhausted.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The address found by the last successful step, byte 0 first.
    ///
    /// The bus reports it as is; the CRC in byte 7 has not been checked.
    pub fn address(&self) -> &[u8; 8] {
        &self.address
    }

    /// Performs one search step on `onewire`.
    ///
    /// # Returns
    /// * `Ok(true)` - a complete address is available through [`SearchState::address`].
    /// * `Ok(false)` - a previous step already exhausted the enumeration.
    ///
    /// # Errors
    /// * [`OneWireError::NoDevicePresent`] if the reset saw no presence pulse.
    ///   The state is left untouched.
    /// * [`OneWireError::BusFault`] if a bit and its complement both read high.
    ///   The state is left untouched, so the step may be retried.
    /// * [`OneWireError::Other`] on errors of the bus implementation.
    pub fn step<T: OneWire>(
        &mut self,
        onewire: &mut T,
    ) -> Result<bool, OneWireError<T::BusError>> {
        if self.done {
            return Ok(false);
        }
        if !onewire.reset()?.presence() {
            return Err(OneWireError::NoDevicePresent);
        }
        onewire.write_byte(ONEWIRE_SEARCH_CMD)?;

        let mut address = self.address;
        let mut last_zero = None;
        for position in 0..ROM_BITS {
            let id_bit = onewire.read_bit()?;
            let complement_bit = onewire.read_bit()?;
            let bit = match (id_bit, complement_bit) {
                // nobody pulled the line low in either phase
                (true, true) => return Err(OneWireError::BusFault),
                // devices disagree
                (false, false) => {
                    let bit = match self.last_zero_branch {
                        Some(pivot) if position == pivot => true,
                        Some(pivot) if position < pivot => get_bit(&self.address, position),
                        _ => false,
                    };
                    if !bit {
                        last_zero = Some(position);
                    }
                    bit
                }
                (id_bit, _) => id_bit,
            };
            set_bit(&mut address, position, bit);
            // devices not matching the chosen bit stop responding
            onewire.write_bit(bit)?;
        }

        self.address = address;
        match last_zero {
            None => self.done = true,
            Some(_) => self.last_zero_branch = last_zero,
        }
        Ok(true)
    }
}

fn get_bit(address: &[u8; 8], position: u8) -> bool {
    address[(position / 8) as usize] & (1 << (position % 8)) != 0
}

fn set_bit(address: &mut [u8; 8], position: u8, value: bool) {
    let mask = 1 << (position % 8);
    let byte = &mut address[(position / 8) as usize];
    if value {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}

/// A structure for searching devices on a 1-Wire bus.
/// This structure drives the [`SearchState`] machine against a borrowed bus.
pub struct OneWireSearch<'a, T> {
    onewire: &'a mut T,
    state: SearchState,
}

impl<T> core::fmt::Debug for OneWireSearch<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OneWireSearch")
            .field("state", &self.state)
            .finish()
    }
}

impl<'a, T> OneWireSearch<'a, T> {
    /// Creates a new [`OneWireSearch`] instance starting a fresh enumeration.
    ///
    /// # Arguments
    /// * `onewire` - A mutable reference to a type that implements the `OneWire` trait.
    pub fn new(onewire: &'a mut T) -> Self {
        Self {
            onewire,
            state: SearchState::new(),
        }
    }

    /// Current search state.
    pub fn state(&self) -> &SearchState {
        &self.state
    }
}

impl<T: OneWire> OneWireSearch<'_, T> {
    /// Searches for the next device on the 1-Wire bus.
    /// This method implements the [1-Wire search algorithm](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html) to discover devices connected to the bus.
    /// The [next](OneWireSearch::next) method can be called repeatedly to find all devices on the bus.
    /// At the end of the search, calling this method will return `None` to indicate that no more devices are present.
    ///
    /// The ROM code is returned as the bus reported it; validate it with
    /// [`OneWireCrc::validate`](crate::OneWireCrc::validate) before trusting it.
    ///
    /// # Returns
    /// A result containing the ROM code of the found device as a `u64` value
    /// (byte 0 of the ROM in the least significant byte).
    ///
    /// | Bit | Description |
    /// |-----|-------------|
    /// | 0-7 | Family code (e.g., 0x26 for DS2438) |
    /// | 8-55 | Serial number |
    /// | 56-63 | CRC-8 (`0b1_0011_0001` poly) |
    ///
    /// # Errors
    /// See [`SearchState::step`].
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<u64>, OneWireError<T::BusError>> {
        if !self.state.step(self.onewire)? {
            return Ok(None);
        }
        let rom = u64::from_le_bytes(self.state.address);
        log::trace!(
            "search step found {rom:016x}, last zero branch {:?}, done {}",
            self.state.last_zero_branch,
            self.state.done
        );
        Ok(Some(rom))
    }
}
