//! Section Audio Module
//!
//! WAV handling for per-section narration audio: wrapping raw PCM from
//! providers, probing durations, loading samples for transcription, and
//! concatenating section files into the final narration track.
//!
//! 16 kHz mono 16-bit PCM is the interchange format; it is what the speech
//! recognizer consumes directly.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{SectionIndex, TimeSec};

/// Sample rate the recognizer expects
pub const RECOGNIZER_SAMPLE_RATE: u32 = 16_000;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while handling section audio
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to read WAV data: {0}")]
    ReadError(String),

    #[error("Failed to write WAV data: {0}")]
    WriteError(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio format mismatch between sections: {0}")]
    FormatMismatch(String),

    #[error("Audio segment contains no samples")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;

// =============================================================================
// Audio Segment
// =============================================================================

/// One section's synthesized audio, written to a request-scoped temp file.
///
/// Owned exclusively by the request that created it; the file is removed
/// when the request's workspace is cleaned up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSegment {
    /// Section this audio narrates
    pub section_index: SectionIndex,
    /// Location of the WAV file on disk
    pub path: PathBuf,
    /// Total duration in seconds
    pub duration_sec: TimeSec,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

// =============================================================================
// WAV Operations
// =============================================================================

/// Wraps raw 16-bit little-endian PCM into an in-memory WAV container.
pub fn wrap_pcm16_wav(pcm: &[u8], sample_rate: u32) -> AudioResult<Vec<u8>> {
    if pcm.is_empty() {
        return Err(AudioError::Empty);
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| AudioError::WriteError(e.to_string()))?;
        for chunk in pcm.chunks_exact(2) {
            let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
            writer
                .write_sample(sample)
                .map_err(|e| AudioError::WriteError(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioError::WriteError(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

/// Probes in-memory WAV data for `(sample_rate, duration_sec)`.
pub fn probe_wav_bytes(bytes: &[u8]) -> AudioResult<(u32, TimeSec)> {
    let reader =
        hound::WavReader::new(Cursor::new(bytes)).map_err(|e| AudioError::ReadError(e.to_string()))?;
    probe_reader(&reader)
}

/// Probes a WAV file for `(sample_rate, duration_sec)`.
pub fn probe_wav(path: &Path) -> AudioResult<(u32, TimeSec)> {
    let reader =
        hound::WavReader::open(path).map_err(|e| AudioError::ReadError(e.to_string()))?;
    probe_reader(&reader)
}

fn probe_reader<R: std::io::Read>(reader: &hound::WavReader<R>) -> AudioResult<(u32, TimeSec)> {
    let spec = reader.spec();
    let frames = reader.duration();
    if frames == 0 {
        return Err(AudioError::Empty);
    }
    let duration = frames as f64 / spec.sample_rate as f64;
    Ok((spec.sample_rate, duration))
}

/// Writes one section's WAV bytes into the request workspace and returns the
/// resulting [`AudioSegment`] with its probed duration.
pub fn write_section_wav(
    dir: &Path,
    section_index: SectionIndex,
    wav_bytes: &[u8],
) -> AudioResult<AudioSegment> {
    let (sample_rate, duration_sec) = probe_wav_bytes(wav_bytes)?;

    let path = dir.join(format!("section_{:04}.wav", section_index));
    std::fs::write(&path, wav_bytes)?;

    Ok(AudioSegment {
        section_index,
        path,
        duration_sec,
        sample_rate,
    })
}

/// Loads audio samples from a WAV file as f32 values normalized to
/// [-1.0, 1.0], validating the recognizer interchange format (16 kHz mono).
pub fn load_audio_samples(wav_path: &Path) -> AudioResult<Vec<f32>> {
    let reader =
        hound::WavReader::open(wav_path).map_err(|e| AudioError::ReadError(e.to_string()))?;

    let spec = reader.spec();
    if spec.sample_rate != RECOGNIZER_SAMPLE_RATE {
        return Err(AudioError::UnsupportedFormat(format!(
            "Expected {} Hz sample rate, got {} Hz",
            RECOGNIZER_SAMPLE_RATE, spec.sample_rate
        )));
    }
    if spec.channels != 1 {
        return Err(AudioError::UnsupportedFormat(format!(
            "Expected mono audio, got {} channels",
            spec.channels
        )));
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
        bits => {
            return Err(AudioError::UnsupportedFormat(format!(
                "Unsupported bit depth: {}",
                bits
            )));
        }
    };

    Ok(samples)
}

/// Concatenates section WAV files, in order, into one narration track.
///
/// All segments must share sample rate, channel count, and bit depth. Returns
/// the total duration of the concatenated audio in seconds.
pub fn concat_sections(segments: &[AudioSegment], output_path: &Path) -> AudioResult<TimeSec> {
    if segments.is_empty() {
        return Err(AudioError::Empty);
    }

    let first = hound::WavReader::open(&segments[0].path)
        .map_err(|e| AudioError::ReadError(e.to_string()))?;
    let spec = first.spec();
    drop(first);

    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(AudioError::UnsupportedFormat(format!(
            "Concatenation requires 16-bit integer PCM, got {}-bit",
            spec.bits_per_sample
        )));
    }

    let mut writer = hound::WavWriter::create(output_path, spec)
        .map_err(|e| AudioError::WriteError(e.to_string()))?;
    let mut total_frames: u64 = 0;

    for segment in segments {
        let reader = hound::WavReader::open(&segment.path)
            .map_err(|e| AudioError::ReadError(e.to_string()))?;
        let seg_spec = reader.spec();
        if seg_spec != spec {
            return Err(AudioError::FormatMismatch(format!(
                "Section {} has {} Hz/{} ch, expected {} Hz/{} ch",
                segment.section_index,
                seg_spec.sample_rate,
                seg_spec.channels,
                spec.sample_rate,
                spec.channels
            )));
        }
        total_frames += reader.duration() as u64;
        for sample in reader.into_samples::<i16>() {
            let sample = sample.map_err(|e| AudioError::ReadError(e.to_string()))?;
            writer
                .write_sample(sample)
                .map_err(|e| AudioError::WriteError(e.to_string()))?;
        }
    }

    writer
        .finalize()
        .map_err(|e| AudioError::WriteError(e.to_string()))?;

    Ok(total_frames as f64 / spec.sample_rate as f64)
}

/// Generates `duration_sec` of silence as in-memory WAV bytes.
///
/// Used by tests and mock providers that need structurally valid audio.
pub fn silence_wav(duration_sec: TimeSec, sample_rate: u32) -> AudioResult<Vec<u8>> {
    let frames = (duration_sec * sample_rate as f64).round().max(1.0) as usize;
    let pcm = vec![0u8; frames * 2];
    wrap_pcm16_wav(&pcm, sample_rate)
}

// =============================================================================
// Tests
// =============================================================================
