//! BRR File Loader
//!
//! Reads compressed sample data from disk at the configured offset.

use crate::brr::{decode_blocks, Block};
use crate::playback::PlaybackConfig;
use crate::{BrrError, Result};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load and decode the blocks of a BRR sample from `path`
pub fn load_blocks<P: AsRef<Path>>(path: P, config: &PlaybackConfig) -> Result<Vec<Block>> {
    let path = path.as_ref();
    config.validate()?;

    let file = File::open(path).map_err(|e| {
        BrrError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open '{}': {}", path.display(), e),
        ))
    })?;
    let mut reader = BufReader::new(file);

    let blocks = decode_blocks(&mut reader, config.offset, config.end_block_override)?;
    info!(
        "Loaded {} blocks from '{}' at offset {:#x}",
        blocks.len(),
        path.display(),
        config.offset
    );
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file_with_offset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xEE; 3]).unwrap();
        file.write_all(&[0x00, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11]).unwrap();
        file.write_all(&[0x01, 0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x22]).unwrap();
        file.flush().unwrap();

        let config = PlaybackConfig::default().with_offset(3);
        let blocks = load_blocks(file.path(), &config).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].nibbles, [1; 16]);
        assert!(blocks[1].is_end());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_blocks("/nonexistent/sample.brr", &PlaybackConfig::default()).unwrap_err();
        assert!(matches!(err, BrrError::Io(_)));
    }
}
