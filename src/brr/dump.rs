//! Per-block debug representation

use super::block::{Block, BLOCK_SIZE, NIBBLES_PER_BLOCK};
use super::stream::SampleStream;
use serde::Serialize;
use std::fmt;

/// Observational view of one block and the samples it decodes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDump {
    /// Block index within the sample
    pub index: usize,
    /// The 9 source bytes
    pub bytes: [u8; BLOCK_SIZE],
    /// Header flag labels (`END`, `LOOP`)
    pub flags: Vec<&'static str>,
    /// Filter id
    pub filter: u8,
    /// Shift range
    pub range: u8,
    /// Sign-extended residuals
    pub nibbles: [i8; NIBBLES_PER_BLOCK],
    /// Decoded samples from a straight (non-looping) pass
    pub samples: [i32; NIBBLES_PER_BLOCK],
}

impl BlockDump {
    /// Decode `blocks` once from a clean history and describe each block
    pub fn collect(blocks: &[Block]) -> Vec<BlockDump> {
        let mut stream = SampleStream::new(blocks.to_vec());
        blocks
            .iter()
            .enumerate()
            .map(|(index, block)| {
                let mut samples = [0i32; NIBBLES_PER_BLOCK];
                for sample in samples.iter_mut() {
                    *sample = stream.next_sample();
                }
                BlockDump {
                    index,
                    bytes: block.to_bytes(),
                    flags: block.flags.iter_names().map(|(name, _)| name).collect(),
                    filter: block.filter.id(),
                    range: block.range,
                    nibbles: block.nibbles,
                    samples,
                }
            })
            .collect()
    }
}

impl fmt::Display for BlockDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = if self.flags.is_empty() {
            "--".to_string()
        } else {
            self.flags.join(" ")
        };
        writeln!(
            f,
            "Block {:>4} [{:<8}] filter={} range={:>2}",
            self.index, flags, self.filter, self.range
        )?;
        let nibbles: Vec<String> = self.nibbles.iter().map(|n| format!("{:>3}", n)).collect();
        let bytes: Vec<String> = self.bytes.iter().map(|b| format!("{:02X}", b)).collect();
        writeln!(f, "  bytes:   {}", bytes.join(" "))?;
        writeln!(f, "  nibbles: {}", nibbles.join(" "))?;
        let samples: Vec<String> = self.samples.iter().map(|s| format!("{:>6}", s)).collect();
        write!(f, "  samples: {}", samples.join(" "))
    }
}
