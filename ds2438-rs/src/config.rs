use bitfield_struct::bitfield;

/// Status/configuration register, page 0 byte 0.
///
/// Only the low four bits are writable. TB, NVB and ADB report conversions
/// and EEPROM writes in progress.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct Configuration {
    /// Current A/D and integrated current accumulator enable.
    pub iad: bool,
    /// Current accumulator configuration.
    pub ca: bool,
    /// Shadow the current accumulator to EEPROM.
    pub ee: bool,
    /// Voltage A/D input select: VDD when set, VAD when clear.
    pub ad: bool,
    /// Temperature conversion busy.
    pub tb: bool,
    /// Non-volatile memory busy.
    pub nvb: bool,
    /// Voltage A/D converter busy.
    pub adb: bool,
    #[bits(1)]
    __: u8,
}

/// Input routed to the voltage A/D converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoltageInput {
    /// Auxiliary input, wired to the humidity sensor.
    Vad,
    /// The device's own supply voltage.
    Vdd,
}

impl From<VoltageInput> for Configuration {
    fn from(input: VoltageInput) -> Self {
        Configuration::new().with_ad(input == VoltageInput::Vdd)
    }
}
