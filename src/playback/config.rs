//! Playback configuration
//!
//! All knobs that used to be process-wide settings live in one immutable
//! struct handed to the loader and the playback driver. It can be read from a
//! JSON file and overridden field by field.

use crate::envelope::Envelope;
use crate::{BrrError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Native S-DSP output rate
pub const DEFAULT_SAMPLE_RATE: u32 = 32_000;

/// Decoder and playback settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Byte offset of the first block in the input
    pub offset: u64,
    /// ADSR register bytes (takes precedence over `gain`)
    pub adsr: Option<[u8; 2]>,
    /// Gain register byte
    pub gain: Option<u8>,
    /// Maximum number of blocks to decode; also permits input without an END block
    pub end_block_override: Option<usize>,
    /// Block index to jump back to after the last block
    pub loop_block: Option<usize>,
    /// Output sample rate in Hz
    pub sample_rate: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            offset: 0,
            adsr: None,
            gain: None,
            end_block_override: None,
            loop_block: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl PlaybackConfig {
    /// Parse a JSON configuration document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: PlaybackConfig = serde_json::from_str(text)
            .map_err(|e| BrrError::ConfigError(format!("Invalid configuration JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            BrrError::ConfigError(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Reject values no decoder run can use
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(BrrError::ConfigError(
                "Sample rate must be greater than zero".to_string(),
            ));
        }
        if self.end_block_override == Some(0) {
            return Err(BrrError::ConfigError(
                "End block override must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Envelope selected by the register settings
    pub fn envelope(&self) -> Envelope {
        Envelope::from_config(self.adsr, self.gain)
    }

    /// Set the input offset
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the ADSR register bytes
    pub fn with_adsr(mut self, adsr: [u8; 2]) -> Self {
        self.adsr = Some(adsr);
        self
    }

    /// Set the gain register byte
    pub fn with_gain(mut self, gain: u8) -> Self {
        self.gain = Some(gain);
        self
    }

    /// Limit decoding to `blocks` blocks
    pub fn with_end_block_override(mut self, blocks: usize) -> Self {
        self.end_block_override = Some(blocks);
        self
    }

    /// Loop back to `block` after the last block
    pub fn with_loop_block(mut self, block: usize) -> Self {
        self.loop_block = Some(block);
        self
    }

    /// Set the output sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }
}

/// Parse an unsigned number written as decimal, `0x` hex or `$` hex
pub fn parse_number(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('$'))
    {
        u64::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<u64>()
    };
    parsed.map_err(|_| BrrError::ConfigError(format!("Invalid number '{}'", text)))
}

/// Parse a block index or count
pub fn parse_index(text: &str) -> Result<usize> {
    let value = parse_number(text)?;
    usize::try_from(value).map_err(|_| BrrError::ConfigError(format!("Value '{}' too large", text)))
}

/// Parse an output sample rate in Hz
pub fn parse_sample_rate(text: &str) -> Result<u32> {
    let value = parse_number(text)?;
    u32::try_from(value)
        .map_err(|_| BrrError::ConfigError(format!("Sample rate '{}' too large", text)))
}

/// Parse a 16-bit ADSR register value into its two bytes (MSB first)
pub fn parse_adsr(text: &str) -> Result<[u8; 2]> {
    let value = parse_number(text)?;
    let value = u16::try_from(value).map_err(|_| {
        BrrError::ConfigError(format!("ADSR value '{}' does not fit in 16 bits", text))
    })?;
    Ok(value.to_be_bytes())
}

/// Parse an 8-bit gain register value
pub fn parse_gain(text: &str) -> Result<u8> {
    let value = parse_number(text)?;
    u8::try_from(value)
        .map_err(|_| BrrError::ConfigError(format!("Gain value '{}' does not fit in 8 bits", text)))
}
