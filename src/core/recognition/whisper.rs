//! Local Whisper Engine
//!
//! In-process transcription with word-level timestamps using whisper.cpp via
//! whisper-rs. Conditionally compiled when the `whisper` feature is enabled;
//! without it a stub reports [`RecognitionError::FeatureNotEnabled`].

use std::path::Path;

use super::{RecognitionError, RecognitionResult};

// =============================================================================
// Transcription Options
// =============================================================================

/// Options for local transcription
#[derive(Debug, Clone)]
pub struct TranscriptionOptions {
    /// Language code (e.g. "en") or "auto" for detection
    pub language: Option<String>,
    /// Number of threads to use (0 = auto)
    pub threads: u32,
    /// Initial prompt to guide the model
    pub initial_prompt: Option<String>,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self {
            language: Some("en".to_string()),
            threads: 0,
            initial_prompt: None,
        }
    }
}

/// Returns the directory where Whisper models are looked up by default
pub fn default_models_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("narracap")
        .join("models")
        .join("whisper")
}

// =============================================================================
// Whisper Engine - Feature-gated Implementation
// =============================================================================

#[cfg(feature = "whisper")]
mod engine_impl {
    use super::*;
    use crate::core::recognition::RawWord;
    use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

    /// Whisper transcription engine
    pub struct WhisperEngine {
        context: WhisperContext,
        model_name: String,
    }

    impl WhisperEngine {
        /// Loads a Whisper model from a `.bin` file
        pub fn new(model_path: &Path) -> RecognitionResult<Self> {
            if !model_path.exists() {
                return Err(RecognitionError::ModelNotFound(
                    model_path.to_string_lossy().to_string(),
                ));
            }

            let params = WhisperContextParameters::default();
            let context =
                WhisperContext::new_with_params(model_path.to_str().unwrap_or_default(), params)
                    .map_err(|e| RecognitionError::ModelLoadError(e.to_string()))?;

            let model_name = model_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            Ok(Self {
                context,
                model_name,
            })
        }

        /// Returns the loaded model name
        pub fn model_name(&self) -> &str {
            &self.model_name
        }

        /// Transcribes 16 kHz mono samples into timed words.
        ///
        /// Whisper reports timing per token; tokens are merged into words at
        /// leading-whitespace boundaries.
        pub fn transcribe_words(
            &self,
            samples: &[f32],
            options: &TranscriptionOptions,
        ) -> RecognitionResult<Vec<RawWord>> {
            let mut state = self
                .context
                .create_state()
                .map_err(|e| RecognitionError::TranscriptionFailed(e.to_string()))?;

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            if let Some(ref lang) = options.language {
                if lang != "auto" {
                    params.set_language(Some(lang));
                }
            }
            params.set_token_timestamps(true);
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_print_timestamps(false);
            if options.threads > 0 {
                params.set_n_threads(options.threads as i32);
            }
            if let Some(ref prompt) = options.initial_prompt {
                params.set_initial_prompt(prompt);
            }

            state
                .full(params, samples)
                .map_err(|e| RecognitionError::TranscriptionFailed(e.to_string()))?;

            let num_segments = state
                .full_n_segments()
                .map_err(|e| RecognitionError::TranscriptionFailed(e.to_string()))?;

            let mut words: Vec<RawWord> = Vec::new();
            let mut current = String::new();
            let mut current_start = 0.0f64;
            let mut current_end = 0.0f64;

            for segment in 0..num_segments {
                let num_tokens = state
                    .full_n_tokens(segment)
                    .map_err(|e| RecognitionError::TranscriptionFailed(e.to_string()))?;

                for token in 0..num_tokens {
                    let text = state
                        .full_get_token_text(segment, token)
                        .map_err(|e| RecognitionError::TranscriptionFailed(e.to_string()))?;
                    // Special markers like [_BEG_] carry no speech
                    if text.starts_with("[_") {
                        continue;
                    }

                    let data = state
                        .full_get_token_data(segment, token)
                        .map_err(|e| RecognitionError::TranscriptionFailed(e.to_string()))?;
                    let t0 = data.t0 as f64 / 100.0;
                    let t1 = data.t1 as f64 / 100.0;

                    let starts_new_word = text.starts_with(' ') || current.is_empty();
                    if starts_new_word && !current.trim().is_empty() {
                        words.push(RawWord::new(current.trim(), current_start, current_end));
                        current.clear();
                    }
                    if current.is_empty() {
                        current_start = t0;
                    }
                    current.push_str(&text);
                    current_end = t1;
                }
            }
            if !current.trim().is_empty() {
                words.push(RawWord::new(current.trim(), current_start, current_end));
            }

            Ok(words)
        }
    }
}

#[cfg(feature = "whisper")]
pub use engine_impl::WhisperEngine;

// =============================================================================
// Stub Implementation (when whisper feature is disabled)
// =============================================================================

#[cfg(not(feature = "whisper"))]
#[derive(Debug)]
pub struct WhisperEngine;

#[cfg(not(feature = "whisper"))]
impl WhisperEngine {
    /// Creates a new WhisperEngine (stub - returns error)
    pub fn new(_model_path: &Path) -> RecognitionResult<Self> {
        Err(RecognitionError::FeatureNotEnabled)
    }

    /// Returns the model name (stub)
    pub fn model_name(&self) -> &str {
        ""
    }

    /// Transcribes samples into timed words (stub - returns error)
    pub fn transcribe_words(
        &self,
        _samples: &[f32],
        _options: &TranscriptionOptions,
    ) -> RecognitionResult<Vec<super::RawWord>> {
        Err(RecognitionError::FeatureNotEnabled)
    }
}

// =============================================================================
// Recognizer Adapter
// =============================================================================

/// [`super::SpeechRecognizer`] backed by the in-process engine
#[cfg(feature = "whisper")]
pub struct LocalWhisperRecognizer {
    engine: std::sync::Arc<WhisperEngine>,
    options: TranscriptionOptions,
}

#[cfg(feature = "whisper")]
impl LocalWhisperRecognizer {
    /// Wraps a loaded engine with transcription options
    pub fn new(engine: WhisperEngine, options: TranscriptionOptions) -> Self {
        Self {
            engine: std::sync::Arc::new(engine),
            options,
        }
    }
}

#[cfg(feature = "whisper")]
#[async_trait::async_trait]
impl super::SpeechRecognizer for LocalWhisperRecognizer {
    fn name(&self) -> &str {
        "whisper-local"
    }

    async fn transcribe(
        &self,
        audio: &crate::core::audio::AudioSegment,
    ) -> RecognitionResult<Vec<super::RawWord>> {
        let path = audio.path.clone();
        let samples = tokio::task::spawn_blocking(move || crate::core::audio::load_audio_samples(&path))
            .await
            .map_err(|e| RecognitionError::AudioReadError(e.to_string()))?
            .map_err(|e| RecognitionError::AudioReadError(e.to_string()))?;

        // Inference is CPU-bound; keep it off the async worker threads
        let engine = self.engine.clone();
        let options = self.options.clone();
        tokio::task::spawn_blocking(move || engine.transcribe_words(&samples, &options))
            .await
            .map_err(|e| RecognitionError::TranscriptionFailed(e.to_string()))?
    }
}

// =============================================================================
// Tests
// =============================================================================
