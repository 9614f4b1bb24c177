//! Playback Domain
//!
//! Couples the sample stream with an envelope and owns looping and
//! termination.

pub mod config;
pub mod driver;

pub use config::{
    parse_adsr, parse_gain, parse_index, parse_number, parse_sample_rate, PlaybackConfig,
    DEFAULT_SAMPLE_RATE,
};
pub use driver::Playback;
