//! ADSR envelope
//!
//! Attack rises linearly, Decay and Sustain fall exponentially, and Release
//! falls linearly by 8 every sample until silence.
//!
//! Register layout (two bytes, MSB first):
//! - bit 15: enable (ignored here)
//! - bits 12-14: decay rate
//! - bits 8-11: attack rate
//! - bits 5-7: sustain level
//! - bits 0-4: sustain rate

use super::rate::RateCounter;
use super::{clamp_level, exponential_step};
use std::fmt;

/// Level at which Attack hands over to Decay
const ATTACK_TARGET: u16 = 0x7E0;
/// Regular attack step
const ATTACK_STEP: i32 = 0x20;
/// Attack step at the fastest attack rate
const FAST_ATTACK_STEP: i32 = 0x400;
/// Rate index that selects the fast attack step
const FAST_ATTACK_RATE: u8 = 0x1F;
/// Release step, applied every sample
const RELEASE_STEP: i32 = 8;

/// ADSR phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdsrPhase {
    /// Rising to full level
    Attack,
    /// Falling to the sustain level
    Decay,
    /// Falling toward silence at the sustain rate
    Sustain,
    /// Linear fade to silence (terminal)
    Release,
}

impl fmt::Display for AdsrPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdsrPhase::Attack => write!(f, "ATTACK"),
            AdsrPhase::Decay => write!(f, "DECAY"),
            AdsrPhase::Sustain => write!(f, "SUSTAIN"),
            AdsrPhase::Release => write!(f, "RELEASE"),
        }
    }
}

/// ADSR rate fields unpacked from the two register bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdsrParams {
    /// Attack rate (4 bits)
    pub attack_rate: u8,
    /// Decay rate (3 bits)
    pub decay_rate: u8,
    /// Sustain level (3 bits)
    pub sustain_level: u8,
    /// Sustain rate (5 bits)
    pub sustain_rate: u8,
}

impl AdsrParams {
    /// Unpack from the two register bytes (MSB first)
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        let value = u16::from_be_bytes(bytes);
        AdsrParams {
            attack_rate: ((value >> 8) & 0x0F) as u8,
            decay_rate: ((value >> 12) & 0x07) as u8,
            sustain_level: ((value >> 5) & 0x07) as u8,
            sustain_rate: (value & 0x1F) as u8,
        }
    }

    /// Table index used during Attack
    pub fn attack_rate_index(&self) -> u8 {
        ((self.attack_rate & 0x0F) << 1) | 1
    }

    /// Table index used during Decay
    pub fn decay_rate_index(&self) -> u8 {
        ((self.decay_rate & 0x07) << 1) + 16
    }

    /// Table index used during Sustain
    pub fn sustain_rate_index(&self) -> u8 {
        self.sustain_rate & 0x1F
    }

    /// Level at or below which Decay hands over to Sustain
    pub fn sustain_threshold(&self) -> u16 {
        (u16::from(self.sustain_level & 0x07) + 1) * 0x100
    }
}

/// ADSR envelope state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adsr {
    params: AdsrParams,
    phase: AdsrPhase,
    level: u16,
    counter: RateCounter,
}

impl Adsr {
    /// Start in Attack at level 0
    pub fn new(params: AdsrParams) -> Self {
        Adsr {
            params,
            phase: AdsrPhase::Attack,
            level: 0,
            counter: RateCounter::new(),
        }
    }

    /// Build from the two register bytes
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self::new(AdsrParams::from_bytes(bytes))
    }

    /// Current level
    pub fn level(&self) -> u16 {
        self.level
    }

    /// Current phase
    pub fn phase(&self) -> AdsrPhase {
        self.phase
    }

    /// Rate fields
    pub fn params(&self) -> AdsrParams {
        self.params
    }

    /// State after one more output sample
    pub fn advance(self) -> Self {
        let level = i32::from(self.level);

        match self.phase {
            AdsrPhase::Release => Adsr {
                level: clamp_level(level - RELEASE_STEP),
                ..self
            },
            AdsrPhase::Attack => {
                let rate = self.params.attack_rate_index();
                let (counter, tick) = self.counter.clock(rate);
                let level = if tick {
                    let step = if rate == FAST_ATTACK_RATE {
                        FAST_ATTACK_STEP
                    } else {
                        ATTACK_STEP
                    };
                    clamp_level(level + step)
                } else {
                    self.level
                };
                self.settle(level, counter, level >= ATTACK_TARGET, AdsrPhase::Decay)
            }
            AdsrPhase::Decay => {
                let (counter, tick) = self.counter.clock(self.params.decay_rate_index());
                let level = if tick {
                    clamp_level(exponential_step(level))
                } else {
                    self.level
                };
                let done = level <= self.params.sustain_threshold();
                self.settle(level, counter, done, AdsrPhase::Sustain)
            }
            AdsrPhase::Sustain => {
                let (counter, tick) = self.counter.clock(self.params.sustain_rate_index());
                let level = if tick {
                    clamp_level(exponential_step(level))
                } else {
                    self.level
                };
                self.settle(level, counter, level == 0, AdsrPhase::Release)
            }
        }
    }

    /// Apply a new level, moving to `next` (with a fresh counter) when `done`
    fn settle(self, level: u16, counter: RateCounter, done: bool, next: AdsrPhase) -> Self {
        if done {
            Adsr {
                phase: next,
                level,
                counter: RateCounter::new(),
                ..self
            }
        } else {
            Adsr {
                level,
                counter,
                ..self
            }
        }
    }
}
