//! BRR Sample Decoder for the SNES S-DSP
//!
//! Decodes the 9-byte-per-block BRR (Bit Rate Reduction) sample format used by
//! the SNES sound chip into linear PCM, shapes it with a hardware-accurate
//! ADSR or Gain envelope, and supports infinite looping with filter history
//! carried across the loop seam.
//!
//! # Features
//! - Block decoding with all four linear-prediction filters
//! - ADSR, direct Gain and custom Gain envelope state machines
//! - Loop playback that keeps running until the envelope fades to silence
//! - WAV export and per-block debug dumps
//! - Optional real-time playback
//!
//! # Crate feature flags
//! - `streaming` (opt-in): Real-time audio output (enables optional `rodio` dep)
//!
//! # Quick start
//! ```no_run
//! use brr::{decode_slice, Playback, PlaybackConfig};
//! let data = std::fs::read("sample.brr").unwrap();
//! let config = PlaybackConfig::default();
//! let blocks = decode_slice(&data, 0, None).unwrap();
//! let playback = Playback::new(blocks, &config).unwrap();
//! let pcm: Vec<i32> = playback.collect();
//! ```

#![warn(missing_docs)]

pub mod brr; // Block decoding and predictive sample stream
pub mod envelope; // ADSR / Gain envelopes
pub mod export; // WAV export
pub mod loader; // File I/O
pub mod playback; // Playback driver and configuration
#[cfg(feature = "streaming")]
pub mod streaming; // Audio Output & Streaming

/// Error types for BRR decoding and playback
#[derive(thiserror::Error, Debug)]
pub enum BrrError {
    /// Malformed or truncated compressed input
    #[error("Format error: {0}")]
    FormatError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),
}

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, BrrError>;

// Public API exports
pub use brr::{decode_blocks, decode_slice, Block, BlockDump, BlockFlags, Filter, SampleStream};
pub use envelope::{Adsr, AdsrPhase, CustomGain, Envelope, GainMode};
pub use export::export_to_wav;
pub use loader::load_blocks;
pub use playback::{Playback, PlaybackConfig};
#[cfg(feature = "streaming")]
pub use streaming::{AudioDevice, PlaybackStats};
