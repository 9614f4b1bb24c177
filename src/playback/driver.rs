//! Playback driver
//!
//! Pulls one decoded sample and one envelope step per output frame. When the
//! sample runs out it either jumps back to the loop block (history intact) or
//! stops. A looping sample keeps playing until its envelope has faded to
//! exactly zero.

use super::config::PlaybackConfig;
use crate::brr::{Block, SampleStream};
use crate::envelope::Envelope;
use crate::{BrrError, Result};
use log::{debug, trace, warn};

/// Single-voice BRR player
#[derive(Debug, Clone)]
pub struct Playback {
    stream: SampleStream,
    envelope: Envelope,
    loop_block: Option<usize>,
    sample_rate: u32,
    samples_produced: u64,
    loop_count: u64,
    finished: bool,
}

impl Playback {
    /// Create a player for `blocks` using the envelope and loop point from `config`
    pub fn new(blocks: Vec<Block>, config: &PlaybackConfig) -> Result<Self> {
        config.validate()?;
        Self::with_envelope(blocks, config.envelope(), config.loop_block, config.sample_rate)
    }

    /// Create a player with an explicit envelope
    pub fn with_envelope(
        blocks: Vec<Block>,
        envelope: Envelope,
        loop_block: Option<usize>,
        sample_rate: u32,
    ) -> Result<Self> {
        if blocks.is_empty() {
            return Err(BrrError::FormatError("No blocks to play".to_string()));
        }
        if let Some(index) = loop_block {
            if index >= blocks.len() {
                return Err(BrrError::ConfigError(format!(
                    "Loop block {} out of range ({} blocks)",
                    index,
                    blocks.len()
                )));
            }
        }

        debug!(
            "Playback: {} blocks, loop {:?}, {} Hz, {}",
            blocks.len(),
            loop_block,
            sample_rate,
            envelope
        );

        Ok(Playback {
            stream: SampleStream::new(blocks),
            envelope,
            loop_block,
            sample_rate,
            samples_produced: 0,
            loop_count: 0,
            finished: false,
        })
    }

    /// Produce the next output sample, or `None` once playback has ended
    pub fn next_frame(&mut self) -> Option<i32> {
        if self.finished {
            return None;
        }

        if !self.stream.has_next() && !self.restart() {
            self.finished = true;
            debug!(
                "Playback finished after {} samples ({} loops)",
                self.samples_produced, self.loop_count
            );
            return None;
        }

        let sample = self.stream.next_sample();
        let output = self.envelope.apply(sample);
        self.envelope = self.envelope.advance();
        self.samples_produced += 1;
        Some(output)
    }

    /// Jump back to the loop block if one is set and the envelope is still audible
    fn restart(&mut self) -> bool {
        let Some(block) = self.loop_block else {
            return false;
        };
        if self.envelope.level() == 0 {
            return false;
        }
        if let Err(err) = self.stream.loop_to(block) {
            warn!("Stopping instead of looping: {}", err);
            return false;
        }
        self.loop_count += 1;
        trace!(
            "Loop {} -> block {} at sample {} (level {:#05x})",
            self.loop_count,
            block,
            self.samples_produced,
            self.envelope.level()
        );
        true
    }

    /// Current envelope state
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Underlying sample stream
    pub fn stream(&self) -> &SampleStream {
        &self.stream
    }

    /// Output samples produced so far
    pub fn samples_produced(&self) -> u64 {
        self.samples_produced
    }

    /// Number of loop restarts so far
    pub fn loop_count(&self) -> u64 {
        self.loop_count
    }

    /// Output sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Whether a loop point is configured
    pub fn is_looping(&self) -> bool {
        self.loop_block.is_some()
    }

    /// Whether playback has ended
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Elapsed playback time in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        self.samples_produced as f64 / f64::from(self.sample_rate)
    }
}

impl Iterator for Playback {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        self.next_frame()
    }
}
