use crate::Configuration;
use embedded_onewire::{OneWireCrc, OneWireError, OneWireResult};
use fixed::types::I8F8;

const STATUS: usize = 0;
const TEMP_LSB: usize = 1;
const TEMP_MSB: usize = 2;
const VOLT_LSB: usize = 3;
const VOLT_MSB: usize = 4;

/// A CRC-verified 9-byte scratchpad page.
///
/// Layout of page 0: status/configuration, temperature LSB and MSB, voltage
/// LSB and MSB, three more register bytes, CRC-8 of the first eight bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scratchpad([u8; 9]);

impl Scratchpad {
    /// Checks the trailing CRC byte and wraps the frame.
    pub fn verify<E>(frame: [u8; 9]) -> OneWireResult<Self, E> {
        if OneWireCrc::validate(&frame) {
            Ok(Scratchpad(frame))
        } else {
            Err(OneWireError::InvalidCrc)
        }
    }

    pub fn bytes(&self) -> &[u8; 9] {
        &self.0
    }

    pub fn configuration(&self) -> Configuration {
        Configuration::from_bits(self.0[STATUS])
    }

    /// Temperature register, 1/32 °C resolution.
    pub fn temperature(&self) -> I8F8 {
        I8F8::from_le_bytes([self.0[TEMP_LSB], self.0[TEMP_MSB]])
    }

    /// Whole degrees and the 5-bit fraction field (units of 1/32 °C).
    pub fn temperature_parts(&self) -> (i8, u8) {
        (self.0[TEMP_MSB] as i8, self.0[TEMP_LSB] >> 3)
    }

    /// Raw voltage register, 10 mV per LSB.
    pub fn voltage_raw(&self) -> u16 {
        u16::from_le_bytes([self.0[VOLT_LSB], self.0[VOLT_MSB]])
    }

    /// Voltage in mV.
    pub fn voltage(&self) -> u32 {
        u32::from(self.voltage_raw()) * 10
    }
}

#[cfg(test)]
mod tests {
    use super::Scratchpad;
    use core::convert::Infallible;
    use embedded_onewire::{OneWireCrc, OneWireError};
    use fixed::types::I8F8;

    fn frame(data: [u8; 8]) -> [u8; 9] {
        let mut frame = [0; 9];
        frame[..8].copy_from_slice(&data);
        frame[8] = OneWireCrc::compute(&data);
        frame
    }

    #[test]
    fn decodes_registers() {
        let pad = Scratchpad::verify::<Infallible>(frame([0x08, 0x30, 0x19, 0xf4, 0x01, 0, 0, 0]))
            .unwrap();
        assert!(pad.configuration().ad());
        assert_eq!(pad.temperature(), I8F8::from_num(25.1875));
        assert_eq!(pad.temperature_parts(), (25, 6));
        assert_eq!(pad.voltage_raw(), 500);
        assert_eq!(pad.voltage(), 5000);
    }

    #[test]
    fn negative_temperature() {
        let pad = Scratchpad::verify::<Infallible>(frame([0, 0x80, 0xff, 0, 0, 0, 0, 0])).unwrap();
        assert_eq!(pad.temperature(), I8F8::from_num(-0.5));
        assert_eq!(pad.temperature_parts(), (-1, 16));
    }

    #[test]
    fn rejects_bad_crc() {
        let mut raw = frame([0x00, 0x30, 0x19, 0x64, 0x00, 0, 0, 0]);
        raw[8] ^= 0x01;
        assert_eq!(
            Scratchpad::verify::<Infallible>(raw),
            Err(OneWireError::InvalidCrc)
        );
    }
}
