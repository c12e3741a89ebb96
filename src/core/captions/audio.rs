//! Audio Sample Loading
//!
//! Loads the 16 kHz mono WAV produced by the extract-audio stage into
//! normalized f32 samples for the whisper backend.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading audio samples
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to open WAV file: {0}")]
    OpenFailed(String),

    #[error("Expected 16kHz sample rate, got {0} Hz")]
    WrongSampleRate(u32),

    #[error("Expected mono audio, got {0} channels")]
    WrongChannelCount(u16),

    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),
}

/// Result type for audio loading operations
pub type AudioLoadResult<T> = Result<T, AudioError>;

/// Sample rate whisper expects
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Loads audio samples from a WAV file as f32 values normalized to
/// [-1.0, 1.0]. The file must be 16 kHz mono, as produced by the pipeline's
/// extract-audio stage.
pub fn load_audio_samples(wav_path: &Path) -> AudioLoadResult<Vec<f32>> {
    let reader =
        hound::WavReader::open(wav_path).map_err(|e| AudioError::OpenFailed(e.to_string()))?;

    let spec = reader.spec();

    if spec.sample_rate != WHISPER_SAMPLE_RATE {
        return Err(AudioError::WrongSampleRate(spec.sample_rate));
    }

    if spec.channels != 1 {
        return Err(AudioError::WrongChannelCount(spec.channels));
    }

    let samples: Vec<f32> = match spec.bits_per_sample {
        16 => reader
            .into_samples::<i16>()
            .filter_map(Result::ok)
            .map(|s| s as f32 / 32768.0)
            .collect(),
        32 => reader
            .into_samples::<i32>()
            .filter_map(Result::ok)
            .map(|s| s as f32 / 2147483648.0)
            .collect(),
        bits => return Err(AudioError::UnsupportedBitDepth(bits)),
    };

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for sample in samples {
            writer.write_sample(*sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn loads_and_normalizes_16k_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        write_wav(&path, WHISPER_SAMPLE_RATE, 1, &[0, 16384, -16384, 32767]);

        let samples = load_audio_samples(&path).unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 0.5).abs() < 1e-4);
        assert!((samples[2] + 0.5).abs() < 1e-4);
        assert!(samples[3] <= 1.0);
    }

    #[test]
    fn rejects_wrong_sample_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        write_wav(&path, 44_100, 1, &[0]);

        assert!(matches!(
            load_audio_samples(&path),
            Err(AudioError::WrongSampleRate(44_100))
        ));
    }

    #[test]
    fn rejects_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        write_wav(&path, WHISPER_SAMPLE_RATE, 2, &[0, 0]);

        assert!(matches!(
            load_audio_samples(&path),
            Err(AudioError::WrongChannelCount(2))
        ));
    }

    #[test]
    fn missing_file_is_open_error() {
        assert!(matches!(
            load_audio_samples(Path::new("/nonexistent/audio.wav")),
            Err(AudioError::OpenFailed(_))
        ));
    }
}
