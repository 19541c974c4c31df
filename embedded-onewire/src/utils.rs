#[derive(Debug, Default, Clone, Copy)]
/// Calculate CRC-8 used in 1-Wire communications.
///
/// Dallas/Maxim polynomial `x^8 + x^5 + x^4 + 1` in its reflected form
/// (`0x8c`), computed bit by bit without a lookup table.
pub struct OneWireCrc(u8);

impl OneWireCrc {
    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        let mut crc = self.0 ^ byte; // XOR the byte with the current CRC value
        for _ in 0..8 {
            if crc & 0x1 == 0x1 {
                crc = (crc >> 1) ^ 0x8c; // Polynomial for CRC-8
            } else {
                crc >>= 1;
            }
        }
        self.0 = crc;
    }

    /// Compute the CRC of `data`, seeded with zero.
    pub fn compute(data: &[u8]) -> u8 {
        let mut crc = OneWireCrc::default();
        for &byte in data {
            crc.update(byte);
        }
        crc.value()
    }

    /// Validate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes.
    ///
    /// Works for both a ROM code (7 bytes + CRC) and a scratchpad frame
    /// (8 bytes + CRC). An empty sequence is never valid.
    pub fn validate(sequence: &[u8]) -> bool {
        match sequence.split_last() {
            Some((&crc, data)) => Self::compute(data) == crc,
            None => false,
        }
    }
}
