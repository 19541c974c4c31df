#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Bit-bang bus master errors
pub enum BitBangError<E> {
    /// GPIO pin errors.
    Pin(E),
    /// The slot timing violates the 1-Wire sampling windows.
    InvalidTiming(&'static str),
}

impl<E> From<E> for BitBangError<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}
