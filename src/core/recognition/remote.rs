//! Remote Whisper ASR Client
//!
//! Client for an `openai-whisper-asr-webservice`-style server. Sends section
//! audio to the `/asr` endpoint with word timestamps enabled and tolerantly
//! parses the response shapes the service is known to produce.

use async_trait::async_trait;

use super::{RawWord, RecognitionError, RecognitionResult, SpeechRecognizer};
use crate::core::audio::AudioSegment;

const DEFAULT_BASE_URL: &str = "http://localhost:9000";

/// HTTP client for a remote Whisper ASR server
pub struct WhisperAsrClient {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl WhisperAsrClient {
    /// Creates a client for the given server base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: "en".to_string(),
        }
    }

    /// Creates a client for a server on localhost
    pub fn localhost() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Sets the transcription language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Checks whether the server answers its health endpoint
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperAsrClient {
    fn name(&self) -> &str {
        "whisper-asr"
    }

    async fn transcribe(&self, audio: &AudioSegment) -> RecognitionResult<Vec<RawWord>> {
        let bytes = tokio::fs::read(&audio.path)
            .await
            .map_err(|e| RecognitionError::AudioReadError(e.to_string()))?;

        let file_name = audio
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| RecognitionError::RequestFailed(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("audio_file", part);

        let response = self
            .client
            .post(format!("{}/asr", self.base_url))
            .query(&[
                ("task", "transcribe"),
                ("language", self.language.as_str()),
                ("word_timestamps", "true"),
                ("output", "json"),
            ])
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RecognitionError::RequestFailed(format!(
                "ASR server error {}: {}",
                status, detail
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RecognitionError::InvalidResponse(e.to_string()))?;

        Ok(parse_asr_response(&payload))
    }
}

/// Extracts timed words from a Whisper ASR response.
///
/// Three shapes occur in the wild: word lists at the top level, word lists
/// nested in segments, and a plain `text` transcript. The text-only shape
/// carries no usable timing and yields an empty list rather than fabricated
/// timestamps.
pub fn parse_asr_response(payload: &serde_json::Value) -> Vec<RawWord> {
    if let Some(words) = payload.get("words").and_then(|w| w.as_array()) {
        return collect_words(words);
    }

    if let Some(segments) = payload.get("segments").and_then(|s| s.as_array()) {
        let mut out = Vec::new();
        for segment in segments {
            if let Some(words) = segment.get("words").and_then(|w| w.as_array()) {
                out.extend(collect_words(words));
            }
        }
        return out;
    }

    Vec::new()
}

fn collect_words(entries: &[serde_json::Value]) -> Vec<RawWord> {
    let mut out = Vec::new();
    for entry in entries {
        let text = entry
            .get("word")
            .and_then(|w| w.as_str())
            .unwrap_or_default()
            .trim();
        if text.is_empty() {
            continue;
        }
        let start = entry.get("start").and_then(|v| v.as_f64()).unwrap_or(0.0);
        let end = entry
            .get("end")
            .and_then(|v| v.as_f64())
            .unwrap_or(start)
            .max(start);

        let mut word = RawWord::new(text, start, end);
        if let Some(probability) = entry.get("probability").and_then(|v| v.as_f64()) {
            word = word.with_confidence(probability as f32);
        }
        out.push(word);
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
