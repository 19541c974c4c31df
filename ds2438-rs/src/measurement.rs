use crate::Scratchpad;
use core::fmt;

/// Temperature, both voltage channels and the derived relative humidity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// °C
    pub temperature: f32,
    /// Humidity sensor output, mV.
    pub vad: u32,
    /// Supply voltage, mV.
    pub vdd: u32,
    /// Relative humidity, %.
    pub humidity: f32,
}

impl Measurement {
    /// Combines a page read with VAD selected and one with VDD selected.
    ///
    /// The temperature comes from the later (VDD) read.
    pub fn from_scratchpads(vad: &Scratchpad, vdd: &Scratchpad) -> Self {
        let (whole, fraction) = vdd.temperature_parts();
        let temperature = f32::from(whole) + f32::from(fraction) * 32.0 / 1000.0;
        let vad = vad.voltage();
        let vdd = vdd.voltage();
        Measurement {
            temperature,
            vad,
            vdd,
            humidity: relative_humidity(vad, vdd, temperature),
        }
    }
}

/// HIH-4000 style ratiometric sensor, temperature compensated.
fn relative_humidity(vad: u32, vdd: u32, temperature: f32) -> f32 {
    let ratio = vad as f32 / vdd as f32;
    (ratio - 0.16) / (0.0062 * (1.0546 - 0.00216 * temperature))
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TH;{:.3};{:.3}\r\n", self.temperature, self.humidity)
    }
}

#[cfg(test)]
mod tests {
    use super::Measurement;
    use crate::Scratchpad;
    use core::convert::Infallible;
    use embedded_onewire::OneWireCrc;

    fn pad(data: [u8; 8]) -> Scratchpad {
        let mut frame = [0; 9];
        frame[..8].copy_from_slice(&data);
        frame[8] = OneWireCrc::compute(&data);
        Scratchpad::verify::<Infallible>(frame).unwrap()
    }

    #[test]
    fn humidity_from_both_channels() {
        let vad = pad([0x00, 0x30, 0x19, 0x64, 0x00, 0, 0, 0]);
        let vdd = pad([0x00, 0x30, 0x19, 0xf4, 0x01, 0, 0, 0]);
        let m = Measurement::from_scratchpads(&vad, &vdd);
        assert_eq!(m.vad, 1000);
        assert_eq!(m.vdd, 5000);
        assert!((m.temperature - 25.192).abs() < 1e-4);
        assert!((m.humidity - 6.4504).abs() < 1e-3);
        assert_eq!(m.to_string(), "TH;25.192;6.450\r\n");
    }

    #[test]
    fn below_freezing() {
        let vad = pad([0x00, 0x80, 0xff, 0x2c, 0x01, 0, 0, 0]);
        let vdd = pad([0x08, 0x80, 0xff, 0xf4, 0x01, 0, 0, 0]);
        let m = Measurement::from_scratchpads(&vad, &vdd);
        assert!((m.temperature + 0.488).abs() < 1e-4);
        assert!(m.to_string().starts_with("TH;-0.488;"));
        assert!(m.to_string().ends_with("\r\n"));
    }
}
