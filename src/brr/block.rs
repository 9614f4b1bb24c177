//! BRR block layout
//!
//! A block is 9 bytes: one header byte followed by 8 data bytes holding
//! 16 four-bit residuals (high nibble first).
//!
//! Header byte:
//! - bit 0: END (last block of the sample)
//! - bit 1: LOOP (loop target marker, informational)
//! - bits 2-3: prediction filter
//! - bits 4-7: range (left shift applied to each residual)

use bitflags::bitflags;
use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::sequence::pair;
use nom::IResult;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;

use crate::{BrrError, Result};

/// Size of one compressed block in bytes
pub const BLOCK_SIZE: usize = 9;
/// Data bytes following the header
pub const BLOCK_DATA_LEN: usize = BLOCK_SIZE - 1;
/// Residuals per block
pub const NIBBLES_PER_BLOCK: usize = 16;

bitflags! {
    /// Block header flag bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockFlags: u8 {
        /// Last block of the sample
        const END = 0x01;
        /// Loop target marker
        const LOOP = 0x02;
    }
}

impl BlockFlags {
    /// Extract the flag bits from a raw header byte
    pub fn from_header(header: u8) -> Self {
        BlockFlags::from_bits_truncate(header)
    }
}

impl fmt::Display for BlockFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut labels = Vec::new();
        if self.contains(BlockFlags::END) {
            labels.push("END");
        }
        if self.contains(BlockFlags::LOOP) {
            labels.push("LOOP");
        }
        if labels.is_empty() {
            f.write_str("--")
        } else {
            f.write_str(&labels.join(" "))
        }
    }
}

/// Linear-prediction filter selected by header bits 2-3
///
/// The S-DSP computes these with shifts and adds; the coefficients below are
/// the exact dyadic ratios of that integer math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Filter {
    /// `new = raw`
    Zero = 0,
    /// `new = raw + old * 15/16`
    One = 1,
    /// `new = raw + old * 61/32 - older * 15/16`
    Two = 2,
    /// `new = raw + old * 115/64 - older * 13/16`
    Three = 3,
}

impl Filter {
    /// Resolve a filter id, rejecting anything outside 0..=3
    pub fn from_id(id: u8) -> Result<Self> {
        Filter::from_u8(id)
            .ok_or_else(|| BrrError::FormatError(format!("Unsupported filter id {}", id)))
    }

    /// Numeric filter id
    pub fn id(self) -> u8 {
        self as u8
    }

    /// (old, older) coefficients
    fn coefficients(self) -> (f64, f64) {
        match self {
            Filter::Zero => (0.0, 0.0),
            Filter::One => (0.9375, 0.0),
            Filter::Two => (1.90625, 0.9375),
            Filter::Three => (1.796875, 0.8125),
        }
    }

    /// Combine a raw residual with the two previous output samples.
    ///
    /// The sum is truncated toward zero. No clamping to 16 bits is done.
    pub fn predict(self, raw: i32, previous: i32, previous_previous: i32) -> i32 {
        let (old, older) = self.coefficients();
        let value = f64::from(raw) + f64::from(previous) * old - f64::from(previous_previous) * older;
        value.trunc() as i32
    }
}

/// Sign-extend the low 4 bits of `value` (two's complement)
pub fn sign_extend_nibble(value: u8) -> i8 {
    let nibble = (value & 0x0F) as i8;
    if nibble > 7 {
        nibble - 16
    } else {
        nibble
    }
}

/// Residual before filtering: `(nibble << range) >> 1`
pub fn raw_sample(nibble: i8, range: u8) -> i32 {
    (i32::from(nibble) << range) >> 1
}

/// One decoded 9-byte block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// END / LOOP flags
    pub flags: BlockFlags,
    /// Prediction filter
    pub filter: Filter,
    /// Shift range (0..=15)
    pub range: u8,
    /// Sign-extended residuals, in playback order
    pub nibbles: [i8; NIBBLES_PER_BLOCK],
}

type ParseResult<'a, T> = IResult<&'a [u8], T, nom::error::Error<&'a [u8]>>;

fn block_fields(input: &[u8]) -> ParseResult<'_, (u8, &[u8])> {
    pair(be_u8, take(BLOCK_DATA_LEN))(input)
}

impl Block {
    /// Parse a block from exactly one 9-byte unit
    pub fn from_bytes(bytes: &[u8; BLOCK_SIZE]) -> Result<Self> {
        let (_, (header, data)) = block_fields(bytes)
            .map_err(|e| BrrError::FormatError(format!("Malformed block: {:?}", e)))?;

        let filter = Filter::from_id((header >> 2) & 0x03)?;
        let mut nibbles = [0i8; NIBBLES_PER_BLOCK];
        for (chunk, &byte) in nibbles.chunks_exact_mut(2).zip(data) {
            chunk[0] = sign_extend_nibble(byte >> 4);
            chunk[1] = sign_extend_nibble(byte);
        }

        Ok(Block {
            flags: BlockFlags::from_header(header),
            filter,
            range: header >> 4,
            nibbles,
        })
    }

    /// Re-encode the block into its 9-byte form
    pub fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[0] = self.header_byte();
        for (byte, chunk) in bytes[1..].iter_mut().zip(self.nibbles.chunks_exact(2)) {
            *byte = ((chunk[0] as u8 & 0x0F) << 4) | (chunk[1] as u8 & 0x0F);
        }
        bytes
    }

    /// Raw header byte
    pub fn header_byte(&self) -> u8 {
        ((self.range & 0x0F) << 4) | (self.filter.id() << 2) | self.flags.bits()
    }

    /// Whether this is the last block of the sample
    pub fn is_end(&self) -> bool {
        self.flags.contains(BlockFlags::END)
    }

    /// Whether the header carries the loop marker
    pub fn is_loop(&self) -> bool {
        self.flags.contains(BlockFlags::LOOP)
    }
}
