//! BRR Block Decoder
//!
//! Reads consecutive 9-byte blocks from a byte source until a block with the
//! END flag is seen, or until an optional block limit is reached.

use super::block::{Block, BLOCK_SIZE};
use crate::{BrrError, Result};
use log::debug;
use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom};

/// Decode blocks from `source` starting at byte `offset`.
///
/// Decoding stops after the first END block, or after `max_blocks` blocks when
/// a limit is given. Running out of input before an END block is a format
/// error unless `max_blocks` was supplied, in which case the blocks read so far
/// are returned. A trailing partial block is never emitted.
pub fn decode_blocks<R: Read + Seek>(
    source: &mut R,
    offset: u64,
    max_blocks: Option<usize>,
) -> Result<Vec<Block>> {
    if max_blocks == Some(0) {
        return Err(BrrError::ConfigError(
            "End block override must be at least 1".to_string(),
        ));
    }

    source.seek(SeekFrom::Start(offset))?;

    let mut blocks = Vec::new();
    let mut unit = [0u8; BLOCK_SIZE];

    loop {
        if max_blocks.is_some_and(|max| blocks.len() >= max) {
            debug!("Stopped at block limit ({} blocks)", blocks.len());
            break;
        }

        match source.read_exact(&mut unit) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                if max_blocks.is_some() {
                    debug!("Input truncated after {} blocks", blocks.len());
                    break;
                }
                return Err(BrrError::FormatError(format!(
                    "Input ended after {} blocks without an END block (offset {:#x})",
                    blocks.len(),
                    offset
                )));
            }
            Err(e) => return Err(e.into()),
        }

        let block = Block::from_bytes(&unit)?;
        blocks.push(block);
        if block.is_end() {
            break;
        }
    }

    if blocks.is_empty() {
        return Err(BrrError::FormatError(format!(
            "No complete block at offset {:#x}",
            offset
        )));
    }

    debug!(
        "Decoded {} blocks ({} samples) from offset {:#x}",
        blocks.len(),
        blocks.len() * 16,
        offset
    );
    Ok(blocks)
}

/// Decode blocks from an in-memory buffer
pub fn decode_slice(data: &[u8], offset: u64, max_blocks: Option<usize>) -> Result<Vec<Block>> {
    decode_blocks(&mut Cursor::new(data), offset, max_blocks)
}
