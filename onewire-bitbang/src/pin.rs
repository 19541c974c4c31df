use embedded_hal::digital::{Error, InputPin, OutputPin};

/// A single GPIO line that can drive the 1-Wire bus and sample it.
///
/// The line idles high through the bus pull-up. Driving it low is the only
/// thing the master ever needs to force; everything else is released to the
/// pull-up and the slaves.
pub trait BusPin {
    /// Error type of the underlying GPIO.
    type Error: Error;

    /// Sets the output level high.
    fn set_high(&mut self) -> Result<(), Self::Error>;

    /// Sets the output level low.
    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Switches the line to output, driving the last set level.
    fn configure_output(&mut self) -> Result<(), Self::Error>;

    /// Switches the line to a high-impedance input, releasing the bus.
    fn configure_input(&mut self) -> Result<(), Self::Error>;

    /// Samples the line level.
    fn is_high(&mut self) -> Result<bool, Self::Error>;
}

/// Open-drain line wrapper
///
/// Adapts any embedded-hal pin that is both an [`InputPin`] and an
/// [`OutputPin`], configured open-drain with a pull-up. Setting it high
/// releases the line, so no direction switch is needed: switching to input
/// releases, and switching to output is a no-op.
#[derive(Debug)]
pub struct OpenDrain<P>(pub P);

impl<P> OpenDrain<P> {
    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: InputPin + OutputPin> BusPin for OpenDrain<P> {
    type Error = P::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }

    fn configure_output(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn configure_input(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }
}
