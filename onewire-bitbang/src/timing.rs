/// Standard-speed slot timing, in microseconds.
///
/// The defaults follow Maxim application note 126. A slave samples a write
/// slot between 15 µs and 60 µs after the falling edge, so a write-1 must
/// release the line well before 15 µs and a write-0 must hold it for most
/// of the slot. A read slot must be sampled within 15 µs of its falling edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTiming {
    /// Reset pulse low time (tRSTL).
    pub reset_low: u32,
    /// Wait between releasing the reset pulse and sampling presence.
    pub presence_sample: u32,
    /// Rest of the presence-detect window after the sample.
    pub presence_release: u32,
    /// Low time of a write-1 slot.
    pub write_one_low: u32,
    /// High time closing a write-1 slot.
    pub write_one_high: u32,
    /// Low time of a write-0 slot.
    pub write_zero_low: u32,
    /// Recovery after a write-0 slot.
    pub write_zero_recovery: u32,
    /// Low time opening a read slot.
    pub read_init_low: u32,
    /// Wait between releasing a read slot and sampling.
    pub read_sample: u32,
    /// Rest of the read slot after the sample.
    pub read_recovery: u32,
}

impl Default for SlotTiming {
    fn default() -> Self {
        SlotTiming {
            reset_low: 480,
            presence_sample: 70,
            presence_release: 460,
            write_one_low: 5,
            write_one_high: 55,
            write_zero_low: 55,
            write_zero_recovery: 5,
            read_init_low: 1,
            read_sample: 10,
            read_recovery: 50,
        }
    }
}

impl SlotTiming {
    /// Latest point after the falling edge a slave may still sample a write
    /// slot, and latest point a master may sample a read slot.
    pub const SAMPLE_WINDOW: u32 = 15;

    /// Minimum reset pulse low time.
    pub const MIN_RESET_LOW: u32 = 480;

    /// Length of a write-1 slot.
    pub fn write_one_slot(&self) -> u32 {
        self.write_one_low + self.write_one_high
    }

    /// Length of a write-0 slot.
    pub fn write_zero_slot(&self) -> u32 {
        self.write_zero_low + self.write_zero_recovery
    }

    /// Time from the falling edge of a read slot to the sample.
    pub fn read_sample_point(&self) -> u32 {
        self.read_init_low + self.read_sample
    }

    /// Length of a read slot.
    pub fn read_slot(&self) -> u32 {
        self.read_sample_point() + self.read_recovery
    }

    /// Checks the timing against the 1-Wire sampling windows.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.reset_low < Self::MIN_RESET_LOW {
            return Err("reset pulse shorter than 480 µs");
        }
        if self.write_one_low == 0 || self.write_one_low >= Self::SAMPLE_WINDOW {
            return Err("write-1 low time must be within the 15 µs window");
        }
        if self.write_one_low >= self.write_zero_low {
            return Err("write-1 low time must be shorter than write-0 low time");
        }
        if self.write_zero_low < Self::SAMPLE_WINDOW {
            return Err("write-0 low time ends inside the 15 µs window");
        }
        if self.read_init_low == 0 || self.read_sample_point() >= Self::SAMPLE_WINDOW {
            return Err("read slot must be sampled within 15 µs");
        }
        Ok(())
    }
}
