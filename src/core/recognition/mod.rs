//! Speech Recognition Module
//!
//! Turns a section's audio segment back into a list of recognized words with
//! local timestamps. Recognition failures are never fatal to a request: the
//! pipeline maps them to an empty word list, which the aligner absorbs with
//! estimated timing.

mod models;
#[cfg(feature = "remote-providers")]
mod remote;
mod whisper;

pub use models::RawWord;
#[cfg(feature = "remote-providers")]
pub use remote::WhisperAsrClient;
#[cfg(feature = "whisper")]
pub use whisper::LocalWhisperRecognizer;
pub use whisper::{default_models_dir, TranscriptionOptions, WhisperEngine};

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::audio::AudioSegment;
use crate::core::SectionIndex;

// =============================================================================
// Error Types
// =============================================================================

/// Errors a recognizer can produce.
///
/// These surface to the pipeline as "no recognition data", not as request
/// failures.
#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("Recognizer request failed: {0}")]
    RequestFailed(String),

    #[error("Unusable recognizer response: {0}")]
    InvalidResponse(String),

    #[error("Failed to read audio: {0}")]
    AudioReadError(String),

    #[error("Model file not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to load model: {0}")]
    ModelLoadError(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Whisper feature not enabled. Rebuild with --features whisper")]
    FeatureNotEnabled,
}

/// Result type for recognition operations
pub type RecognitionResult<T> = Result<T, RecognitionError>;

// =============================================================================
// Recognizer Trait
// =============================================================================

/// Trait for speech-to-text backends with word-level timestamps
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &str;

    /// Transcribes one audio segment into recognized words.
    ///
    /// An empty list is a valid answer meaning "no usable timing data".
    async fn transcribe(&self, audio: &AudioSegment) -> RecognitionResult<Vec<RawWord>>;
}

// =============================================================================
// Mock Recognizer for Testing
// =============================================================================

/// Scriptable recognizer used by unit and integration tests
#[derive(Default)]
pub struct MockRecognizer {
    words_by_section: HashMap<SectionIndex, Vec<RawWord>>,
    fail: bool,
}

impl MockRecognizer {
    /// Creates a mock that answers every section with an empty word list
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the words returned for one section
    pub fn with_section(mut self, section_index: SectionIndex, words: Vec<RawWord>) -> Self {
        self.words_by_section.insert(section_index, words);
        self
    }

    /// Makes every transcription attempt fail
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transcribe(&self, audio: &AudioSegment) -> RecognitionResult<Vec<RawWord>> {
        if self.fail {
            return Err(RecognitionError::RequestFailed(
                "mock recognizer is scripted to fail".to_string(),
            ));
        }
        Ok(self
            .words_by_section
            .get(&audio.section_index)
            .cloned()
            .unwrap_or_default())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn segment(section_index: SectionIndex) -> AudioSegment {
        AudioSegment {
            section_index,
            path: PathBuf::from("/tmp/unused.wav"),
            duration_sec: 1.0,
            sample_rate: 16_000,
        }
    }

    #[tokio::test]
    async fn test_mock_returns_scripted_words() {
        let recognizer = MockRecognizer::new()
            .with_section(1, vec![RawWord::new("hello", 0.0, 0.4)]);

        let words = recognizer.transcribe(&segment(1)).await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "hello");
    }

    #[tokio::test]
    async fn test_mock_unscripted_section_is_empty() {
        let recognizer = MockRecognizer::new();
        let words = recognizer.transcribe(&segment(5)).await.unwrap();
        assert!(words.is_empty());
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let recognizer = MockRecognizer::new().failing();
        let result = recognizer.transcribe(&segment(0)).await;
        assert!(matches!(result, Err(RecognitionError::RequestFailed(_))));
    }
}
