//! Synthesis Request/Result Models

use serde::{Deserialize, Serialize};

use crate::core::TimeSec;

/// Parameters for synthesizing one section of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    /// Text to speak (one section, already normalized)
    pub text: String,
    /// Provider-specific voice identifier
    pub voice: String,
    /// Speaking speed (0.5 - 2.0, 1.0 is normal)
    pub speed: f32,
}

impl SynthesisRequest {
    /// Creates a request with the default voice at normal speed
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: "default".to_string(),
            speed: 1.0,
        }
    }

    /// Sets the voice
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Sets the speaking speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.clamp(0.5, 2.0);
        self
    }

    /// Validates the request
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("Text cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Audio produced by one provider for one section
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// Complete WAV container bytes
    pub wav_bytes: Vec<u8>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration_sec: TimeSec,
    /// Provider that produced the audio
    pub provider: String,
    /// Wall-clock generation time in milliseconds
    pub generation_time_ms: u64,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = SynthesisRequest::new("Hello world");
        assert_eq!(request.text, "Hello world");
        assert_eq!(request.voice, "default");
        assert_eq!(request.speed, 1.0);
    }

    #[test]
    fn test_request_builder() {
        let request = SynthesisRequest::new("Test")
            .with_voice("en_us_rocket")
            .with_speed(1.5);

        assert_eq!(request.voice, "en_us_rocket");
        assert_eq!(request.speed, 1.5);
    }

    #[test]
    fn test_speed_clamped() {
        assert_eq!(SynthesisRequest::new("x").with_speed(5.0).speed, 2.0);
        assert_eq!(SynthesisRequest::new("x").with_speed(0.1).speed, 0.5);
    }

    #[test]
    fn test_validate() {
        assert!(SynthesisRequest::new("Some text").validate().is_ok());
        assert!(SynthesisRequest::new("   ").validate().is_err());
    }
}
