//! Coqui TTS Provider
//!
//! Client for a self-hosted Coqui TTS server. The server answers `/tts`
//! requests with a complete WAV body, or a JSON error payload.

use async_trait::async_trait;
use std::time::Instant;

use crate::core::audio;
use crate::core::synthesis::{
    ProviderConfig, ProviderError, ProviderResult, SynthesisProvider, SynthesisRequest,
    SynthesizedAudio,
};

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Coqui TTS server provider
pub struct CoquiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl CoquiProvider {
    /// Creates the provider from connection settings
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[async_trait]
impl SynthesisProvider for CoquiProvider {
    fn name(&self) -> &str {
        "coqui"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> ProviderResult<SynthesizedAudio> {
        request.validate().map_err(ProviderError::RequestFailed)?;

        let body = serde_json::json!({
            "text": request.text,
            "voice": request.voice,
            "language": "en",
            "speed": request.speed,
        });

        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/tts", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed(format!(
                "Coqui server error {}: {}",
                status, detail
            )));
        }

        // A 200 with a JSON body is the server reporting a synthesis error
        if content_type.contains("application/json") {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::InvalidResponse(format!(
                "Coqui server returned an error payload: {}",
                detail
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
