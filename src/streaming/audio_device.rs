//! Audio device integration using rodio

use super::{PlaybackStats, SharedStats, STATS_UPDATE_INTERVAL};
use crate::export::to_f32;
use crate::playback::Playback;
use crate::{BrrError, Result};
use parking_lot::Mutex;
use rodio::{OutputStream, Sink, Source};
use std::sync::Arc;
use std::time::Duration;

/// Audio source that pulls from a [`Playback`]
pub struct PlaybackSource {
    playback: Playback,
    stats: SharedStats,
    /// Samples pulled since the last stats update
    pending: u64,
}

impl PlaybackSource {
    /// Wrap `playback`, publishing progress into `stats`
    pub fn new(playback: Playback, stats: SharedStats) -> Self {
        PlaybackSource {
            playback,
            stats,
            pending: 0,
        }
    }

    fn publish(&mut self, finished: bool) {
        let mut stats = self.stats.lock();
        stats.samples_played = self.playback.samples_produced();
        stats.loop_count = self.playback.loop_count();
        stats.envelope_level = self.playback.envelope().level();
        stats.finished = finished;
        self.pending = 0;
    }
}

impl Source for PlaybackSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.playback.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for PlaybackSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        match self.playback.next_frame() {
            Some(sample) => {
                self.pending += 1;
                if self.pending >= STATS_UPDATE_INTERVAL {
                    self.publish(false);
                }
                Some(to_f32(sample))
            }
            None => {
                if !self.stats.lock().finished {
                    self.publish(true);
                }
                None
            }
        }
    }
}

/// Audio playback device using rodio
pub struct AudioDevice {
    _stream: OutputStream,
    sink: Sink,
    stats: SharedStats,
}

impl AudioDevice {
    /// Open the default output device and start playing `playback`
    pub fn new(playback: Playback) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| BrrError::AudioDeviceError(format!("Failed to create audio stream: {}", e)))?;

        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| BrrError::AudioDeviceError(format!("Failed to create audio sink: {}", e)))?;

        let stats = Arc::new(Mutex::new(PlaybackStats::default()));
        sink.append(PlaybackSource::new(playback, Arc::clone(&stats)));

        Ok(AudioDevice {
            _stream: stream,
            sink,
            stats,
        })
    }

    /// Snapshot of playback progress
    pub fn stats(&self) -> PlaybackStats {
        self.stats.lock().clone()
    }

    /// Whether the device has drained all samples
    pub fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    /// Pause playback
    pub fn pause(&self) {
        self.sink.pause();
    }

    /// Resume playback
    pub fn play(&self) {
        self.sink.play();
    }

    /// Stop playback and drop queued samples
    pub fn stop(&self) {
        self.sink.stop();
    }

    /// Block until the sink is empty
    pub fn wait_for_finish(&self) {
        self.sink.sleep_until_end();
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
