//! Audio export
//!
//! Output samples are 32-bit because filtering is unclamped; they saturate to
//! 16 bits only when leaving the crate.

pub mod wav;

pub use wav::export_to_wav;

/// Saturate an output sample to signed 16-bit PCM
pub fn to_pcm16(sample: i32) -> i16 {
    sample.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Convert an output sample to a float in [-1.0, 1.0)
pub fn to_f32(sample: i32) -> f32 {
    f32::from(to_pcm16(sample)) / 32768.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pcm16_saturates() {
        assert_eq!(to_pcm16(40_000), i16::MAX);
        assert_eq!(to_pcm16(-40_000), i16::MIN);
        assert_eq!(to_pcm16(-123), -123);
    }

    #[test]
    fn test_f32_range() {
        assert_relative_eq!(to_f32(16384), 0.5);
        assert_relative_eq!(to_f32(-32768), -1.0);
        assert_relative_eq!(to_f32(1_000_000), 32767.0 / 32768.0);
        assert_relative_eq!(to_f32(0), 0.0);
    }
}
