//! BRR Decoding Domain
//!
//! Block parsing, the predictive sample stream, and the block debug dump.

pub mod block;
pub mod decoder;
pub mod dump;
pub mod stream;

pub use block::{Block, BlockFlags, Filter, BLOCK_SIZE, NIBBLES_PER_BLOCK};
pub use decoder::{decode_blocks, decode_slice};
pub use dump::BlockDump;
pub use stream::SampleStream;
