//! Envelope Engine
//!
//! Volume envelopes applied to decoded samples. Each variant is a small
//! `Copy` state machine; [`Envelope::advance`] returns the state for the next
//! output sample instead of mutating in place.

pub mod adsr;
pub mod gain;
pub mod rate;

pub use adsr::{Adsr, AdsrParams, AdsrPhase};
pub use gain::{CustomGain, GainMode, GainSetting};
pub use rate::{RateCounter, RATE_TABLE};

use log::debug;
use std::fmt;

/// Highest level a timed envelope can reach
pub const MAX_LEVEL: u16 = 0x7FF;
/// Unattenuated level used when no envelope is configured
pub const UNITY_LEVEL: u16 = 0x800;

pub(crate) fn clamp_level(value: i32) -> u16 {
    value.clamp(0, i32::from(MAX_LEVEL)) as u16
}

/// `level - 1 - ((level - 1) >> 8)`, shared by Decay, Sustain and
/// exponential gain
pub(crate) fn exponential_step(level: i32) -> i32 {
    level - 1 - ((level - 1) >> 8)
}

/// Volume envelope, selected once from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Attack / Decay / Sustain / Release
    Adsr(Adsr),
    /// Fixed level
    Direct {
        /// Output level
        level: u16,
    },
    /// Timed gain ramp
    Custom(CustomGain),
}

impl Envelope {
    /// Select an envelope from register values.
    ///
    /// ADSR bytes win over a gain byte; with neither, playback is unattenuated.
    pub fn from_config(adsr: Option<[u8; 2]>, gain: Option<u8>) -> Self {
        let envelope = match (adsr, gain) {
            (Some(bytes), _) => Envelope::Adsr(Adsr::from_bytes(bytes)),
            (None, Some(byte)) => Envelope::from_gain_byte(byte),
            (None, None) => Envelope::Direct { level: UNITY_LEVEL },
        };
        debug!("Envelope: {}", envelope);
        envelope
    }

    /// Envelope for a gain register byte
    pub fn from_gain_byte(value: u8) -> Self {
        match GainSetting::from_byte(value) {
            GainSetting::Direct(level) => Envelope::Direct { level },
            GainSetting::Custom { mode, rate } => Envelope::Custom(CustomGain::new(mode, rate)),
        }
    }

    /// Current level
    pub fn level(&self) -> u16 {
        match self {
            Envelope::Adsr(adsr) => adsr.level(),
            Envelope::Direct { level } => *level,
            Envelope::Custom(gain) => gain.level(),
        }
    }

    /// State after one more output sample
    pub fn advance(self) -> Self {
        match self {
            Envelope::Adsr(adsr) => Envelope::Adsr(adsr.advance()),
            Envelope::Direct { .. } => self,
            Envelope::Custom(gain) => Envelope::Custom(gain.advance()),
        }
    }

    /// Scale a decoded sample by the current level (`level / 0x800`)
    pub fn apply(&self, sample: i32) -> i32 {
        ((i64::from(sample) * i64::from(self.level())) >> 11) as i32
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope::Direct { level: UNITY_LEVEL }
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Envelope::Adsr(adsr) => {
                let p = adsr.params();
                write!(
                    f,
                    "ADSR {} level={:#05x} (attack={} decay={} sustain_level={} sustain_rate={})",
                    adsr.phase(),
                    adsr.level(),
                    p.attack_rate,
                    p.decay_rate,
                    p.sustain_level,
                    p.sustain_rate
                )
            }
            Envelope::Direct { level } => write!(f, "Gain DIRECT level={:#05x}", level),
            Envelope::Custom(gain) => write!(
                f,
                "Gain {} rate={} level={:#05x}",
                gain.mode(),
                gain.rate(),
                gain.level()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adsr_wins_over_gain() {
        let env = Envelope::from_config(Some([0x8F, 0xE0]), Some(0x7F));
        assert!(matches!(env, Envelope::Adsr(_)));
        assert_eq!(env.level(), 0);
    }

    #[test]
    fn test_gain_selection() {
        assert_eq!(
            Envelope::from_config(None, Some(0x40)),
            Envelope::Direct { level: 0x400 }
        );
        let env = Envelope::from_config(None, Some(0xDF));
        match env {
            Envelope::Custom(gain) => {
                assert_eq!(gain.mode(), GainMode::LinearIncrease);
                assert_eq!(gain.rate(), 31);
            }
            other => panic!("expected custom gain, got {:?}", other),
        }
    }

    #[test]
    fn test_default_is_unity() {
        let env = Envelope::from_config(None, None);
        assert_eq!(env.level(), UNITY_LEVEL);
        assert_eq!(env.apply(12345), 12345);
        assert_eq!(env.apply(-7), -7);
        assert_eq!(env, Envelope::default());
    }

    #[test]
    fn test_direct_never_changes() {
        let mut env = Envelope::from_gain_byte(0x33);
        for _ in 0..1000 {
            env = env.advance();
        }
        assert_eq!(env.level(), 0x330);
    }

    #[test]
    fn test_apply_scales_by_level() {
        let env = Envelope::Direct { level: 0x400 };
        assert_eq!(env.apply(1000), 500);
        let silent = Envelope::Direct { level: 0 };
        assert_eq!(silent.apply(i32::MAX), 0);
    }

    #[test]
    fn test_levels_stay_in_range() {
        let envelopes = [
            Envelope::from_config(Some([0xFF, 0x3F]), None),
            Envelope::from_gain_byte(0x9F),
            Envelope::from_gain_byte(0xBF),
            Envelope::from_gain_byte(0xDF),
            Envelope::from_gain_byte(0xFF),
        ];
        for mut env in envelopes {
            for _ in 0..5000 {
                env = env.advance();
                assert!(env.level() <= MAX_LEVEL);
            }
        }
    }

    #[test]
    fn test_display() {
        let env = Envelope::from_gain_byte(0xE3);
        assert_eq!(env.to_string(), "Gain BENT_INCREASE rate=3 level=0x000");
    }
}
