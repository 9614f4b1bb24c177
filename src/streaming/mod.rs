//! Audio Output & Streaming
//!
//! Live playback through the system audio device. The audio thread pulls
//! samples straight from a [`Playback`](crate::Playback); progress is shared
//! back to the caller through [`PlaybackStats`].

pub mod audio_device;

pub use audio_device::{AudioDevice, PlaybackSource};

use parking_lot::Mutex;
use std::sync::Arc;

/// Samples pulled between stats updates
pub const STATS_UPDATE_INTERVAL: u64 = 512;
/// How often callers should poll stats while waiting for playback
pub const STATUS_POLL_MS: u64 = 100;

/// Playback progress published by the audio thread
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackStats {
    /// Samples handed to the audio device
    pub samples_played: u64,
    /// Loop restarts so far
    pub loop_count: u64,
    /// Current envelope level
    pub envelope_level: u16,
    /// Whether the player ran out of samples
    pub finished: bool,
}

/// Stats handle shared between the audio thread and the caller
pub type SharedStats = Arc<Mutex<PlaybackStats>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = PlaybackStats::default();
        assert_eq!(stats.samples_played, 0);
        assert!(!stats.finished);
    }
}
