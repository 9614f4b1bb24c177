//! Gain envelopes
//!
//! Gain register (one byte):
//! - bit 7 = 0: direct level, `bits 0-6 << 4`
//! - bit 7 = 1: custom mode in bits 5-6, rate code in bits 0-4

use super::rate::RateCounter;
use super::{clamp_level, exponential_step, MAX_LEVEL};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;

/// Slope change point for bent increase
const BENT_KNEE: u16 = 0x600;
const LINEAR_STEP: i32 = 32;
const BENT_STEP: i32 = 8;

/// Custom gain mode (bits 5-6 of the gain byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum GainMode {
    /// -32 per tick
    LinearDecrease = 0,
    /// `-(((level - 1) >> 8) + 1)` per tick
    ExponentialDecrease = 1,
    /// +32 per tick
    LinearIncrease = 2,
    /// +32 per tick below 0x600, +8 above
    BentIncrease = 3,
}

impl GainMode {
    /// Whether the mode starts from full level
    pub fn is_decrease(self) -> bool {
        matches!(self, GainMode::LinearDecrease | GainMode::ExponentialDecrease)
    }
}

impl fmt::Display for GainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GainMode::LinearDecrease => write!(f, "LINEAR_DECREASE"),
            GainMode::ExponentialDecrease => write!(f, "EXPONENTIAL_DECREASE"),
            GainMode::LinearIncrease => write!(f, "LINEAR_INCREASE"),
            GainMode::BentIncrease => write!(f, "BENT_INCREASE"),
        }
    }
}

/// Decoded gain byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainSetting {
    /// Fixed level
    Direct(u16),
    /// Timed ramp
    Custom {
        /// Ramp shape
        mode: GainMode,
        /// Rate code
        rate: u8,
    },
}

impl GainSetting {
    /// Decode a gain register byte
    pub fn from_byte(value: u8) -> Self {
        if value & 0x80 == 0 {
            GainSetting::Direct(u16::from(value & 0x7F) << 4)
        } else {
            // Two bits always map to a mode
            let mode = GainMode::from_u8((value >> 5) & 0x03).unwrap_or(GainMode::LinearDecrease);
            GainSetting::Custom {
                mode,
                rate: value & 0x1F,
            }
        }
    }
}

/// Custom gain envelope state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomGain {
    mode: GainMode,
    rate: u8,
    level: u16,
    counter: RateCounter,
}

impl CustomGain {
    /// Start at 0x7ff for decrease modes, 0 for increase modes
    pub fn new(mode: GainMode, rate: u8) -> Self {
        CustomGain {
            mode,
            rate: rate & 0x1F,
            level: if mode.is_decrease() { MAX_LEVEL } else { 0 },
            counter: RateCounter::new(),
        }
    }

    /// Current level
    pub fn level(&self) -> u16 {
        self.level
    }

    /// Ramp shape
    pub fn mode(&self) -> GainMode {
        self.mode
    }

    /// Rate code
    pub fn rate(&self) -> u8 {
        self.rate
    }

    /// State after one more output sample
    pub fn advance(self) -> Self {
        let (counter, tick) = self.counter.clock(self.rate);
        if !tick {
            return CustomGain { counter, ..self };
        }

        let level = i32::from(self.level);
        let next = match self.mode {
            GainMode::LinearDecrease => level - LINEAR_STEP,
            GainMode::ExponentialDecrease => exponential_step(level),
            GainMode::LinearIncrease => level + LINEAR_STEP,
            GainMode::BentIncrease if self.level < BENT_KNEE => level + LINEAR_STEP,
            GainMode::BentIncrease => level + BENT_STEP,
        };

        CustomGain {
            level: clamp_level(next),
            counter,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_level(mode: GainMode, level: u16) -> CustomGain {
        CustomGain {
            level,
            ..CustomGain::new(mode, 31)
        }
    }

    #[test]
    fn test_direct_byte() {
        assert_eq!(GainSetting::from_byte(0x7F), GainSetting::Direct(0x7F0));
        assert_eq!(GainSetting::from_byte(0x00), GainSetting::Direct(0));
        assert_eq!(GainSetting::from_byte(0x12), GainSetting::Direct(0x120));
    }

    #[test]
    fn test_custom_byte() {
        assert_eq!(
            GainSetting::from_byte(0b1110_0101),
            GainSetting::Custom {
                mode: GainMode::BentIncrease,
                rate: 5
            }
        );
        assert_eq!(
            GainSetting::from_byte(0b1001_1111),
            GainSetting::Custom {
                mode: GainMode::LinearDecrease,
                rate: 31
            }
        );
    }

    #[test]
    fn test_initial_levels() {
        assert_eq!(CustomGain::new(GainMode::LinearDecrease, 10).level(), MAX_LEVEL);
        assert_eq!(CustomGain::new(GainMode::ExponentialDecrease, 10).level(), MAX_LEVEL);
        assert_eq!(CustomGain::new(GainMode::LinearIncrease, 10).level(), 0);
        assert_eq!(CustomGain::new(GainMode::BentIncrease, 10).level(), 0);
    }

    #[test]
    fn test_linear_decrease_clamps_at_zero() {
        let gain = with_level(GainMode::LinearDecrease, 40).advance();
        assert_eq!(gain.level(), 8);
        assert_eq!(gain.advance().level(), 0);
    }

    #[test]
    fn test_exponential_decrease() {
        let gain = CustomGain::new(GainMode::ExponentialDecrease, 31).advance();
        // 0x7ff - ((0x7fe >> 8) + 1) = 0x7ff - 8
        assert_eq!(gain.level(), 0x7F7);
        let gain = with_level(GainMode::ExponentialDecrease, 1).advance();
        assert_eq!(gain.level(), 0);
        assert_eq!(gain.advance().level(), 0);
    }

    #[test]
    fn test_linear_increase_clamps_at_max() {
        let gain = with_level(GainMode::LinearIncrease, 0x7F0).advance();
        assert_eq!(gain.level(), MAX_LEVEL);
    }

    #[test]
    fn test_bent_increase_knee() {
        let below = with_level(GainMode::BentIncrease, 0x5FF).advance();
        assert_eq!(below.level(), 0x5FF + 32);
        let at = with_level(GainMode::BentIncrease, 0x600).advance();
        assert_eq!(at.level(), 0x608);
        let above = with_level(GainMode::BentIncrease, 0x700).advance();
        assert_eq!(above.level(), 0x708);
    }

    #[test]
    fn test_rate_gates_steps() {
        // Rate 26 -> every 6 samples
        let mut gain = CustomGain::new(GainMode::LinearIncrease, 26);
        for _ in 0..5 {
            gain = gain.advance();
        }
        assert_eq!(gain.level(), 0);
        gain = gain.advance();
        assert_eq!(gain.level(), 32);
    }

    #[test]
    fn test_rate_zero_holds() {
        let mut gain = CustomGain::new(GainMode::LinearDecrease, 0);
        for _ in 0..10_000 {
            gain = gain.advance();
        }
        assert_eq!(gain.level(), MAX_LEVEL);
    }
}
