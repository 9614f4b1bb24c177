//! Predictive Sample Stream
//!
//! Turns decoded blocks into PCM one residual at a time, keeping the two most
//! recent outputs as prediction history. The cursor can be moved back to any
//! block for looping; the history is left untouched so the loop seam decodes
//! exactly like a natural continuation.

use super::block::{raw_sample, Block, NIBBLES_PER_BLOCK};
use crate::{BrrError, Result};

/// Lazily decoded sample sequence over a fixed block list
#[derive(Debug, Clone)]
pub struct SampleStream {
    blocks: Vec<Block>,
    block_index: usize,
    nibble_index: usize,
    /// Last output sample ("old")
    previous: i32,
    /// Output before that ("older")
    previous_previous: i32,
}

impl SampleStream {
    /// Create a stream positioned at the first nibble of the first block
    pub fn new(blocks: Vec<Block>) -> Self {
        SampleStream {
            blocks,
            block_index: 0,
            nibble_index: 0,
            previous: 0,
            previous_previous: 0,
        }
    }

    /// True while at least one nibble remains before the end of the last block
    pub fn has_next(&self) -> bool {
        self.block_index < self.blocks.len()
    }

    /// Decode the next sample.
    ///
    /// # Panics
    ///
    /// Panics if the stream is exhausted. Check [`SampleStream::has_next`] first.
    pub fn next_sample(&mut self) -> i32 {
        assert!(
            self.has_next(),
            "next_sample called on an exhausted stream (block {} of {})",
            self.block_index,
            self.blocks.len()
        );

        let block = &self.blocks[self.block_index];
        let raw = raw_sample(block.nibbles[self.nibble_index], block.range);
        let sample = block
            .filter
            .predict(raw, self.previous, self.previous_previous);

        self.previous_previous = self.previous;
        self.previous = sample;

        self.nibble_index += 1;
        if self.nibble_index == NIBBLES_PER_BLOCK {
            self.nibble_index = 0;
            self.block_index += 1;
        }

        sample
    }

    /// Move the cursor to the start of `block_index` without touching history
    pub fn loop_to(&mut self, block_index: usize) -> Result<()> {
        if block_index >= self.blocks.len() {
            return Err(BrrError::ConfigError(format!(
                "Loop block {} out of range ({} blocks)",
                block_index,
                self.blocks.len()
            )));
        }
        self.block_index = block_index;
        self.nibble_index = 0;
        Ok(())
    }

    /// Prediction history as `(previous, previous_previous)`
    pub fn history(&self) -> (i32, i32) {
        (self.previous, self.previous_previous)
    }

    /// Cursor as `(block_index, nibble_index)`
    pub fn position(&self) -> (usize, usize) {
        (self.block_index, self.nibble_index)
    }

    /// Blocks backing this stream
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Samples in one pass over all blocks
    pub fn len_per_pass(&self) -> usize {
        self.blocks.len() * NIBBLES_PER_BLOCK
    }
}

impl Iterator for SampleStream {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.has_next() {
            Some(self.next_sample())
        } else {
            None
        }
    }
}
