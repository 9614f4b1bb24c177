//! WAV file export functionality

use super::to_pcm16;
use crate::playback::Playback;
use crate::{BrrError, Result};
use log::info;
use std::path::Path;

fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Render playback to a mono 16-bit WAV file
///
/// Looping playback only ends once its envelope reaches zero, which some
/// envelopes never do; `max_samples` caps the render in that case.
/// Returns the number of samples written.
///
/// # Examples
///
/// ```no_run
/// use brr::{export_to_wav, load_blocks, Playback, PlaybackConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PlaybackConfig::default().with_loop_block(0).with_gain(0x9F);
/// let blocks = load_blocks("sample.brr", &config)?;
/// let mut playback = Playback::new(blocks, &config)?;
///
/// export_to_wav(&mut playback, "output.wav", Some(32_000 * 10))?;
/// # Ok(())
/// # }
/// ```
pub fn export_to_wav<P: AsRef<Path>>(
    playback: &mut Playback,
    output_path: P,
    max_samples: Option<usize>,
) -> Result<usize> {
    let output_path = output_path.as_ref();
    let mut writer = hound::WavWriter::create(output_path, wav_spec(playback.sample_rate()))
        .map_err(|e| BrrError::AudioFileError(format!("Failed to create WAV file: {}", e)))?;

    let limit = max_samples.unwrap_or(usize::MAX);
    let mut written = 0usize;
    for sample in playback.by_ref().take(limit) {
        writer
            .write_sample(to_pcm16(sample))
            .map_err(|e| BrrError::AudioFileError(format!("Failed to write sample: {}", e)))?;
        written += 1;
    }

    writer
        .finalize()
        .map_err(|e| BrrError::AudioFileError(format!("Failed to finalize WAV file: {}", e)))?;

    info!(
        "Wrote {} samples ({:.2}s) to {}",
        written,
        written as f64 / f64::from(playback.sample_rate()),
        output_path.display()
    );
    Ok(written)
}
