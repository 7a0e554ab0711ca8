//! SpeechT5 TTS Provider
//!
//! Client for a PyTorch TTS server running Hugging Face SpeechT5 models,
//! answering `/synthesize` requests with a WAV body.

use async_trait::async_trait;
use std::time::Instant;

use crate::core::audio;
use crate::core::synthesis::{
    ProviderConfig, ProviderError, ProviderResult, SynthesisProvider, SynthesisRequest,
    SynthesizedAudio,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_MODEL: &str = "microsoft/speecht5_tts";

/// SpeechT5 model server provider
pub struct SpeechT5Provider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl SpeechT5Provider {
    /// Creates the provider from connection settings
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model_id.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

#[async_trait]
impl SynthesisProvider for SpeechT5Provider {
    fn name(&self) -> &str {
        "speecht5"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> ProviderResult<SynthesizedAudio> {
        request.validate().map_err(ProviderError::RequestFailed)?;

        let body = serde_json::json!({
            "text": request.text,
            "voice": request.voice,
            "model": self.model,
            "language": "en",
            "speed": request.speed,
        });

        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/synthesize", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed(format!(
                "SpeechT5 server error {}: {}",
                status, detail
            )));
        }

        let wav_bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?
            .to_vec();
        if wav_bytes.is_empty() {
            return Err(ProviderError::EmptyAudio);
        }

        let (sample_rate, duration_sec) = audio::probe_wav_bytes(&wav_bytes)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(SynthesizedAudio {
            wav_bytes,
            sample_rate,
            duration_sec,
            provider: self.name().to_string(),
            generation_time_ms: started.elapsed().as_millis() as u64,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_identity() {
        let provider = SpeechT5Provider::new(ProviderConfig::default());
        assert_eq!(provider.name(), "speecht5");
        assert!(provider.is_available());
        assert_eq!(provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_model_override() {
        let provider =
            SpeechT5Provider::new(ProviderConfig::default().with_model("custom/model"));
        assert_eq!(provider.model, "custom/model");
    }
}
