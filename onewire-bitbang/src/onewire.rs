use crate::{BitBang, BitBangError, BusPin};
use embedded_hal::delay::DelayNs;
use embedded_onewire::{OneWire, OneWireError, OneWireResult, OneWireStatus};

/// Outcome of a reset/presence-detect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence(bool);

impl OneWireStatus for Presence {
    fn presence(&self) -> bool {
        self.0
    }
}

impl<P: BusPin, D: DelayNs> BitBang<P, D> {
    /// Master reset pulse followed by a single presence sample.
    fn reset_pulse(&mut self) -> Result<bool, P::Error> {
        self.pin.set_high()?;
        self.pin.configure_output()?;

        self.pin.set_low()?;
        self.delay.delay_us(self.timing.reset_low);

        self.pin.configure_input()?;
        self.delay.delay_us(self.timing.presence_sample);

        // a slave answers by holding the line low
        let present = !self.pin.is_high()?;

        // stay in receive mode for the whole presence-detect window
        self.delay.delay_us(self.timing.presence_release);
        Ok(present)
    }

    /// One write slot; the line must already be configured as output.
    fn write_slot(&mut self, bit: bool) -> Result<(), P::Error> {
        if bit {
            self.pin.set_low()?;
            self.delay.delay_us(self.timing.write_one_low);
            self.pin.set_high()?;
            self.delay.delay_us(self.timing.write_one_high);
        } else {
            self.pin.set_low()?;
            self.delay.delay_us(self.timing.write_zero_low);
            self.pin.set_high()?;
            self.delay.delay_us(self.timing.write_zero_recovery);
        }
        Ok(())
    }

    fn read_slot(&mut self) -> Result<bool, P::Error> {
        self.pin.set_low()?;
        self.pin.configure_output()?;
        self.delay.delay_us(self.timing.read_init_low);

        self.pin.configure_input()?;
        self.delay.delay_us(self.timing.read_sample);

        let bit = self.pin.is_high()?;
        self.delay.delay_us(self.timing.read_recovery);
        Ok(bit)
    }

    fn send_byte(&mut self, mut byte: u8) -> Result<(), P::Error> {
        self.pin.set_low()?;
        self.pin.configure_output()?;
        for _ in 0..8 {
            self.write_slot(byte & 0x01 == 0x01)?;
            byte >>= 1;
        }
        Ok(())
    }

    fn receive_byte(&mut self) -> Result<u8, P::Error> {
        self.pin.configure_input()?;
        let mut byte = 0;
        for i in 0..8 {
            if self.read_slot()? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }
}

impl<P: BusPin, D: DelayNs> OneWire for BitBang<P, D> {
    type Status = Presence;

    type BusError = BitBangError<P::Error>;

    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError> {
        if self.reset_pulse().map_err(BitBangError::Pin)? {
            Ok(Presence(true))
        } else {
            Err(OneWireError::NoDevicePresent)
        }
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        self.send_byte(byte).map_err(BitBangError::Pin)?;
        Ok(())
    }

    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        Ok(self.receive_byte().map_err(BitBangError::Pin)?)
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        self.pin.set_high().map_err(BitBangError::Pin)?;
        self.pin.configure_output().map_err(BitBangError::Pin)?;
        self.write_slot(bit).map_err(BitBangError::Pin)?;
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        Ok(self.read_slot().map_err(BitBangError::Pin)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BitBang, BusPin, OpenDrain, SlotTiming};
    use core::{cell::RefCell, convert::Infallible};
    use embedded_hal::delay::DelayNs;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use embedded_onewire::{OneWire, OneWireError, OneWireStatus};
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Edge {
        High,
        Low,
        Output,
        Input,
        Sample,
    }

    /// Virtual clock shared by a tracing pin and delay.
    #[derive(Default)]
    struct Trace {
        now: u64,
        events: Vec<(u64, Edge)>,
        level: bool,
    }

    struct TracePin(Rc<RefCell<Trace>>);

    impl TracePin {
        fn record(&self, edge: Edge) {
            let mut t = self.0.borrow_mut();
            let now = t.now;
            t.events.push((now, edge));
        }
    }

    impl BusPin for TracePin {
        type Error = Infallible;

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.record(Edge::High);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.record(Edge::Low);
            Ok(())
        }

        fn configure_output(&mut self) -> Result<(), Infallible> {
            self.record(Edge::Output);
            Ok(())
        }

        fn configure_input(&mut self) -> Result<(), Infallible> {
            self.record(Edge::Input);
            Ok(())
        }

        fn is_high(&mut self) -> Result<bool, Infallible> {
            self.record(Edge::Sample);
            Ok(self.0.borrow().level)
        }
    }

    struct TraceDelay(Rc<RefCell<Trace>>);

    impl DelayNs for TraceDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().now += u64::from(ns);
        }
    }

    fn traced() -> (BitBang<TracePin, TraceDelay>, Rc<RefCell<Trace>>) {
        let trace = Rc::new(RefCell::new(Trace::default()));
        let bus = BitBang::new(TracePin(trace.clone()), TraceDelay(trace.clone())).unwrap();
        trace.borrow_mut().events.clear();
        (bus, trace)
    }

    /// Low times in ns, from the last falling edge to each release.
    fn low_times(events: &[(u64, Edge)]) -> Vec<u64> {
        let mut fell = None;
        let mut out = Vec::new();
        for &(at, edge) in events {
            match edge {
                Edge::Low => fell = Some(at),
                Edge::High | Edge::Input => {
                    if let Some(start) = fell.take() {
                        out.push(at - start);
                    }
                }
                _ => {}
            }
        }
        out
    }

    #[test]
    fn write_one_is_shorter_than_write_zero() {
        let (mut bus, trace) = traced();
        bus.write_bit(true).unwrap();
        let one = low_times(&trace.borrow().events);
        trace.borrow_mut().events.clear();
        bus.write_bit(false).unwrap();
        let zero = low_times(&trace.borrow().events);

        assert_eq!(one, vec![5_000]);
        assert_eq!(zero, vec![55_000]);
        assert!(one[0] < zero[0]);
        assert!(one[0] < u64::from(SlotTiming::SAMPLE_WINDOW) * 1_000);
    }

    #[test]
    fn write_slots_have_equal_length() {
        let (mut bus, trace) = traced();
        bus.write_bit(true).unwrap();
        let one = trace.borrow().now;
        bus.write_bit(false).unwrap();
        let zero = trace.borrow().now - one;
        assert_eq!(one, zero);
        assert_eq!(one, 60_000);
    }

    #[test]
    fn read_samples_before_slot_end() {
        let (mut bus, trace) = traced();
        trace.borrow_mut().level = true;
        assert!(bus.read_bit().unwrap());
        let t = trace.borrow();
        let start = t.events.iter().find(|e| e.1 == Edge::Low).unwrap().0;
        let sample = t.events.iter().find(|e| e.1 == Edge::Sample).unwrap().0;
        let released = t.events.iter().find(|e| e.1 == Edge::Input).unwrap().0;
        assert!(released > start);
        assert!(sample - start < u64::from(SlotTiming::SAMPLE_WINDOW) * 1_000);
        assert!(sample < t.now);
        assert_eq!(t.now - start, 61_000);
    }

    #[test]
    fn write_byte_is_lsb_first() {
        let (mut bus, trace) = traced();
        bus.write_byte(0b1010_0011).unwrap();
        let bits: Vec<bool> = low_times(&trace.borrow().events)
            .into_iter()
            .map(|low| low < 15_000)
            .collect();
        assert_eq!(
            bits,
            vec![true, true, false, false, false, true, false, true]
        );
    }

    #[test]
    fn reset_timing() {
        let (mut bus, trace) = traced();
        // the tracing line always reads low: a device is present
        assert!(bus.reset().unwrap().presence());
        let t = trace.borrow();
        let low = t.events.iter().find(|e| e.1 == Edge::Low).unwrap().0;
        let released = t.events.iter().find(|e| e.1 == Edge::Input).unwrap().0;
        let sample = t.events.iter().find(|e| e.1 == Edge::Sample).unwrap().0;
        assert!(released - low >= 480_000);
        assert_eq!(sample - released, 70_000);
        assert!(t.now - released >= 480_000);
    }

    #[test]
    fn reset_detects_presence() {
        let expectations = [
            PinTransaction::set(State::High), // released by new()
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
            PinTransaction::get(State::Low), // presence pulse
        ];
        let mut pin = PinMock::new(&expectations);
        let mut bus = BitBang::new(OpenDrain(pin.clone()), NoopDelay::new()).unwrap();
        assert!(bus.reset().unwrap().presence());
        pin.done();
    }

    #[test]
    fn reset_no_presence() {
        let expectations = [
            PinTransaction::set(State::High),
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
            PinTransaction::get(State::High), // line stays high
        ];
        let mut pin = PinMock::new(&expectations);
        let mut bus = BitBang::new(OpenDrain(pin.clone()), NoopDelay::new()).unwrap();
        assert!(matches!(bus.reset(), Err(OneWireError::NoDevicePresent)));
        pin.done();
    }

    #[test]
    fn read_byte_assembles_lsb_first() {
        let byte = 0xa5u8;
        let mut expectations = vec![
            PinTransaction::set(State::High), // released by new()
            PinTransaction::set(State::High), // switch to input
        ];
        for i in 0..8 {
            let level = if byte & (1 << i) != 0 {
                State::High
            } else {
                State::Low
            };
            expectations.push(PinTransaction::set(State::Low));
            expectations.push(PinTransaction::set(State::High));
            expectations.push(PinTransaction::get(level));
        }
        let mut pin = PinMock::new(&expectations);
        let mut bus = BitBang::new(OpenDrain(pin.clone()), NoopDelay::new()).unwrap();
        assert_eq!(bus.read_byte().unwrap(), byte);
        pin.done();
    }

    #[test]
    fn invalid_timing_is_rejected() {
        let trace = Rc::new(RefCell::new(Trace::default()));
        let timing = SlotTiming {
            write_one_low: 60,
            ..Default::default()
        };
        let built = crate::BitBangBuilder::default()
            .with_timing(timing)
            .build(TracePin(trace.clone()), TraceDelay(trace.clone()));
        assert!(matches!(built, Err(crate::BitBangError::InvalidTiming(_))));
        // the line is left alone
        assert!(trace.borrow().events.is_empty());
    }
}
