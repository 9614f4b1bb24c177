//! Envelope rate timing
//!
//! The S-DSP advances envelopes on a shared counter; each 5-bit rate code maps
//! to a number of output samples between envelope steps.

/// Samples between ticks for each rate code. Rate 0 never ticks.
pub const RATE_TABLE: [u32; 32] = [
    0, 2048, 1536, 1280, 1024, 768, 640, 512, 384, 320, 256, 192, 160, 128, 96, 80, 64, 48, 40, 32,
    24, 20, 16, 12, 10, 8, 6, 5, 4, 3, 2, 1,
];

/// Samples per tick for a rate code (codes above 31 use the low 5 bits)
pub fn samples_per_tick(rate: u8) -> u32 {
    RATE_TABLE[usize::from(rate & 0x1F)]
}

/// Per-sample tick gate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateCounter {
    /// Samples elapsed since the last tick
    elapsed: u32,
}

impl RateCounter {
    /// Create a counter with no elapsed samples
    pub fn new() -> Self {
        RateCounter { elapsed: 0 }
    }

    /// Clock by one sample at `rate`.
    /// Returns the next counter and whether a tick occurred.
    pub fn clock(self, rate: u8) -> (Self, bool) {
        let period = samples_per_tick(rate);
        if period == 0 {
            return (self, false);
        }

        let elapsed = self.elapsed + 1;
        if elapsed >= period {
            (RateCounter { elapsed: 0 }, true)
        } else {
            (RateCounter { elapsed }, false)
        }
    }

    /// Samples elapsed since the last tick
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }
}
