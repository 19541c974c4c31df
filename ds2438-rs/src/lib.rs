#![cfg_attr(not(test), no_std)]
//! DS2438 smart battery monitor, read as a temperature and humidity sensor.
//!
//! The humidity sensor output is wired to the VAD input. A measurement
//! converts temperature and VAD, then converts VDD, and combines both
//! CRC-verified scratchpad reads into a [`Measurement`].

mod config;
mod measurement;
mod scratchpad;

use core::fmt::Write;
use embedded_hal::delay::DelayNs;
use embedded_onewire::{OneWire, OneWireCrc, OneWireError, OneWireResult, OneWireSearch};

pub use config::{Configuration, VoltageInput};
pub use measurement::Measurement;
pub use scratchpad::Scratchpad;

const DS2438_WRITE_SCRATCH: u8 = 0x4e;
const DS2438_READ_SCRATCH: u8 = 0xbe;
const DS2438_RECALL_MEMORY: u8 = 0xb8;
const DS2438_CONVERT_T: u8 = 0x44;
const DS2438_CONVERT_V: u8 = 0xb4;

const ROM_LEN: usize = 8;
const LINE_CAPACITY: usize = 32;

/// A DS2438 on a 1-Wire bus.
///
/// Holds only addressing and timing; the bus and delay are borrowed per call.
#[derive(Debug, Clone, Copy)]
pub struct Ds2438 {
    rom: Option<u64>,
    settle_ms: u32,
}

impl Default for Ds2438 {
    fn default() -> Self {
        Self::new()
    }
}

impl Ds2438 {
    #[inline]
    pub const fn family() -> u8 {
        0x26
    }

    /// A device addressed with Skip ROM, i.e. the only device on the bus.
    pub const fn new() -> Self {
        Self {
            rom: None,
            settle_ms: 20,
        }
    }

    /// Address one device with Match ROM instead.
    pub fn with_rom(mut self, rom: u64) -> Self {
        self.rom = Some(rom);
        self
    }

    /// Wait after each conversion command and configuration write.
    pub fn with_settle_ms(mut self, ms: u32) -> Self {
        self.settle_ms = ms;
        self
    }

    /// Searches the bus and copies every ROM code with a valid CRC into
    /// `buf`, 8 bytes each, byte 0 first.
    ///
    /// Returns the number of ROM codes written. The search stops once `buf`
    /// has no room for another code, when the bus reports no presence, or on
    /// a bus fault during the search; in each case the codes found so far
    /// are kept. Only errors of the bus implementation are returned.
    pub fn enumerate<O: OneWire>(
        bus: &mut O,
        buf: &mut [u8],
    ) -> OneWireResult<usize, O::BusError> {
        let capacity = buf.len() / ROM_LEN;
        let mut devices = 0;
        let mut search = OneWireSearch::new(bus);
        // conduct search
        while devices < capacity {
            let rom = match search.next() {
                Ok(Some(rom)) => rom.to_le_bytes(),
                Ok(None) => break,
                Err(OneWireError::Other(e)) => return Err(OneWireError::Other(e)),
                Err(OneWireError::NoDevicePresent) => {
                    log::debug!("no presence pulse, search ended");
                    break;
                }
                Err(_) => {
                    log::warn!("bus fault during ROM search after {devices} devices");
                    break;
                }
            };
            if !OneWireCrc::validate(&rom) {
                log::warn!("discarding ROM {rom:02x?}: CRC mismatch");
                continue;
            }
            buf[devices * ROM_LEN..(devices + 1) * ROM_LEN].copy_from_slice(&rom);
            devices += 1;
        }
        log::debug!("found {devices} devices");
        Ok(devices)
    }

    /// Recalls memory page `page` into the scratchpad and reads it back.
    ///
    /// # Errors
    /// [`OneWireError::NoDevicePresent`] if either reset goes unanswered,
    /// [`OneWireError::InvalidCrc`] if the frame fails its CRC.
    pub fn read_page<O: OneWire>(
        &self,
        bus: &mut O,
        page: u8,
    ) -> OneWireResult<Scratchpad, O::BusError> {
        bus.address(self.rom)?;
        bus.write_byte(DS2438_RECALL_MEMORY)?;
        bus.write_byte(page)?;

        bus.address(self.rom)?;
        bus.write_byte(DS2438_READ_SCRATCH)?;
        bus.write_byte(page)?;
        let mut frame = [0; 9];
        for b in frame.iter_mut() {
            *b = bus.read_byte()?;
        }
        let pad = Scratchpad::verify(frame);
        if pad.is_err() {
            log::warn!("page {page} failed CRC check");
        }
        pad
    }

    /// Routes `input` to the voltage A/D converter.
    pub fn select_input<O: OneWire>(
        &self,
        bus: &mut O,
        input: VoltageInput,
    ) -> OneWireResult<(), O::BusError> {
        bus.address(self.rom)?;
        bus.write_byte(DS2438_WRITE_SCRATCH)?;
        bus.write_byte(0)?;
        bus.write_byte(Configuration::from(input).into_bits())
    }

    pub fn convert_temperature<O: OneWire, D: DelayNs>(
        &self,
        bus: &mut O,
        delay: &mut D,
    ) -> OneWireResult<(), O::BusError> {
        bus.address(self.rom)?;
        bus.write_byte(DS2438_CONVERT_T)?;
        delay.delay_ms(self.settle_ms);
        Ok(())
    }

    pub fn convert_voltage<O: OneWire, D: DelayNs>(
        &self,
        bus: &mut O,
        delay: &mut D,
    ) -> OneWireResult<(), O::BusError> {
        bus.address(self.rom)?;
        bus.write_byte(DS2438_CONVERT_V)?;
        delay.delay_ms(self.settle_ms);
        Ok(())
    }

    /// Full measurement: temperature and VAD, then VDD.
    ///
    /// Any failed reset or CRC check aborts the whole measurement.
    pub fn measure<O: OneWire, D: DelayNs>(
        &self,
        bus: &mut O,
        delay: &mut D,
    ) -> OneWireResult<Measurement, O::BusError> {
        self.select_input(bus, VoltageInput::Vad)?;
        delay.delay_ms(self.settle_ms);
        self.convert_temperature(bus, delay)?;
        self.convert_voltage(bus, delay)?;
        let vad = self.read_page(bus, 0)?;
        log::trace!("VAD page {:02x?}", vad.bytes());

        self.select_input(bus, VoltageInput::Vdd)?;
        delay.delay_ms(self.settle_ms);
        self.convert_voltage(bus, delay)?;
        let vdd = self.read_page(bus, 0)?;
        log::trace!("VDD page {:02x?}", vdd.bytes());

        let measurement = Measurement::from_scratchpads(&vad, &vdd);
        log::debug!("{measurement:?}");
        Ok(measurement)
    }

    /// Measures and writes `TH;<temperature>;<humidity>\r\n` to `out`.
    ///
    /// The line is formatted first and handed to `out` in a single
    /// `write_str` call. Returns `false`, with nothing written, if the
    /// measurement failed or the line could not be formatted.
    pub fn measure_into<O: OneWire, D: DelayNs, W: Write>(
        &self,
        bus: &mut O,
        delay: &mut D,
        out: &mut W,
    ) -> bool {
        match self.measure(bus, delay) {
            Ok(measurement) => {
                let mut line = heapless::String::<LINE_CAPACITY>::new();
                if write!(line, "{measurement}").is_err() {
                    log::warn!("measurement line exceeds {LINE_CAPACITY} bytes");
                    return false;
                }
                out.write_str(&line).is_ok()
            }
            Err(OneWireError::NoDevicePresent) => {
                log::warn!("measurement failed: device not found");
                false
            }
            Err(OneWireError::InvalidCrc) => {
                log::warn!("measurement failed: CRC mismatch");
                false
            }
            Err(_) => {
                log::warn!("measurement failed: bus error");
                false
            }
        }
    }
}
