//! Audio duration probing with symphonia.
//!
//! Only container/packet metadata is read; samples are never decoded. WAV
//! headers carry the frame count directly. MP3 streams without a Xing/Info
//! header fall back to summing packet durations.

use std::io::Cursor;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

/// Why a clip's duration could not be determined.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Container format not recognized.
    #[error("unrecognized audio format: {0}")]
    Unrecognized(String),
    /// Container holds no audio track.
    #[error("no audio track found")]
    NoAudioTrack,
    /// Track does not declare a sample rate.
    #[error("audio track has no sample rate")]
    MissingSampleRate,
    /// Container is truncated or corrupt.
    #[error("failed to read audio packets: {0}")]
    Read(String),
}

/// Measures the playback duration of an encoded clip.
///
/// Implementations are blocking; callers run them off the async runtime.
pub trait AudioProbe: Send + Sync {
    /// Duration of `data` in seconds, rounded to whole milliseconds.
    fn duration_secs(&self, data: &[u8], mime_type: &str) -> Result<f64, ProbeError>;
}

/// [`AudioProbe`] backed by symphonia's WAV and MP3 readers.
#[derive(Clone, Copy, Debug, Default)]
pub struct SymphoniaProbe;

impl AudioProbe for SymphoniaProbe {
    fn duration_secs(&self, data: &[u8], mime_type: &str) -> Result<f64, ProbeError> {
        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        match mime_type {
            "audio/wav" | "audio/wave" | "audio/x-wav" => {
                let _ = hint.with_extension("wav");
            }
            "audio/mpeg" | "audio/mp3" => {
                let _ = hint.with_extension("mp3");
            }
            _ => {}
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| ProbeError::Unrecognized(e.to_string()))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(ProbeError::NoAudioTrack)?;
        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or(ProbeError::MissingSampleRate)?;
        let declared_frames = track.codec_params.n_frames;

        let frames = match declared_frames {
            Some(n) => n,
            None => {
                let mut total = 0u64;
                loop {
                    match format.next_packet() {
                        Ok(packet) if packet.track_id() == track_id => total += packet.dur,
                        Ok(_) => {}
                        Err(SymphoniaError::IoError(ref e))
                            if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                        {
                            break;
                        }
                        Err(e) => return Err(ProbeError::Read(e.to_string())),
                    }
                }
                total
            }
        };

        Ok(frames_to_secs(frames, sample_rate))
    }
}

/// Whole-millisecond duration of `frames` at `sample_rate`.
fn frames_to_secs(frames: u64, sample_rate: u32) -> f64 {
    let ms = (frames as f64 * 1000.0 / f64::from(sample_rate)).round();
    ms / 1000.0
}

/// Minimal 16-bit PCM WAV for tests.
#[cfg(test)]
pub(crate) fn test_wav(sample_rate: u32, channels: u16, num_samples: u32) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * u32::from(channels) * u32::from(bits_per_sample) / 8;
    let block_align = channels * bits_per_sample / 8;
    let data_size = num_samples * u32::from(channels) * u32::from(bits_per_sample) / 8;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(file_size as usize + 8);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    buf.resize(buf.len() + data_size as usize, 0);
    buf
}
