//! ElevenLabs TTS Provider
//!
//! Calls the ElevenLabs text-to-speech API, requesting raw 16 kHz PCM so the
//! result can be wrapped into the WAV interchange format without a decode
//! step.

use async_trait::async_trait;
use std::time::Instant;

use crate::core::audio;
use crate::core::synthesis::{
    ProviderConfig, ProviderError, ProviderResult, SynthesisProvider, SynthesisRequest,
    SynthesizedAudio,
};

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_MODEL: &str = "eleven_monolingual_v1";
/// Known-good voice used when the caller asks for "default"
const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
const PCM_SAMPLE_RATE: u32 = 16_000;

/// ElevenLabs API provider
pub struct ElevenLabsProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model_id: String,
}

impl ElevenLabsProvider {
    /// Creates the provider from connection settings
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model_id: config.model_id.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn resolve_voice<'a>(&self, voice: &'a str) -> &'a str {
        if voice.is_empty() || voice == "default" {
            DEFAULT_VOICE_ID
        } else {
            voice
        }
    }
}

#[async_trait]
impl SynthesisProvider for ElevenLabsProvider {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> ProviderResult<SynthesizedAudio> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("ElevenLabs API key not set".to_string()))?;

        request.validate().map_err(ProviderError::RequestFailed)?;

        let voice = self.resolve_voice(&request.voice);
        let url = format!(
            "{}/v1/text-to-speech/{}?output_format=pcm_16000",
            self.base_url, voice
        );
        let body = serde_json::json!({
            "text": request.text,
            "model_id": self.model_id,
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.75,
            },
        });

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("xi-api-key", api_key)
            .header("Accept", "audio/pcm")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed(format!(
                "ElevenLabs API error {}: {}",
                status, detail
            )));
        }

        let pcm = response
            .bytes()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        if pcm.is_empty() {
            return Err(ProviderError::EmptyAudio);
        }

        let wav_bytes = audio::wrap_pcm16_wav(&pcm, PCM_SAMPLE_RATE)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        let duration_sec = pcm.len() as f64 / 2.0 / PCM_SAMPLE_RATE as f64;

        Ok(SynthesizedAudio {
            wav_bytes,
            sample_rate: PCM_SAMPLE_RATE,
            duration_sec,
            provider: self.name().to_string(),
            generation_time_ms: started.elapsed().as_millis() as u64,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
