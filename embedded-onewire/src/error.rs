/// One wire communication error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying hardware.
    Other(E),
    /// Indicates that no device answered the reset pulse with a presence pulse.
    NoDevicePresent,
    /// A received ROM code or data frame failed its CRC-8 check.
    InvalidCrc,
    /// Both the bit and its complement read high during a ROM search,
    /// meaning no device drove the line in either phase.
    BusFault,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for OneWireError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Other(e) => write!(f, "bus error: {e:?}"),
            Self::NoDevicePresent => f.write_str("no presence pulse after reset"),
            Self::InvalidCrc => f.write_str("CRC-8 mismatch"),
            Self::BusFault => f.write_str("no response during ROM search"),
        }
    }
}
