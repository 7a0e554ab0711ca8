//! Synthesis Provider Abstraction
//!
//! One trait covers every text-to-speech backend; concrete providers are
//! interchangeable and composed through the ordered fallback list in
//! `TimingConfig`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::models::{SynthesisRequest, SynthesizedAudio};
use crate::core::audio;

/// Errors a single provider attempt can produce
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Provider is not configured (e.g. missing API key)
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Request to the backend failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Backend answered with something unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Backend returned no audio
    #[error("Empty audio returned")]
    EmptyAudio,
}

/// Result type for single provider attempts
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Connection settings for an HTTP-backed provider
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// API key, for providers that require one
    pub api_key: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Model identifier override
    pub model_id: Option<String>,
}

impl ProviderConfig {
    /// Creates a config carrying an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Sets the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the model identifier
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }
}

/// Trait for text-to-speech backends
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    /// Identifier used in `TimingConfig.provider_fallback_order`
    fn name(&self) -> &str;

    /// Whether the provider has everything it needs to accept requests
    fn is_available(&self) -> bool;

    /// Synthesizes one section of text into WAV audio
    async fn synthesize(&self, request: &SynthesisRequest) -> ProviderResult<SynthesizedAudio>;
}

// =============================================================================
// Provider Registry
// =============================================================================

/// Named collection of providers the fallback chain resolves against
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn SynthesisProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its own name; the latest registration wins
    pub fn register(&mut self, provider: Arc<dyn SynthesisProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Looks up a provider by identifier
    pub fn get(&self, name: &str) -> Option<Arc<dyn SynthesisProvider>> {
        self.providers.get(name).cloned()
    }

    /// Registered provider names
    pub fn names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}

// =============================================================================
// Mock Provider for Testing
// =============================================================================

/// Scriptable provider used by unit and integration tests
pub struct MockSynthesisProvider {
    name: String,
    available: bool,
    fail: bool,
    delay: Duration,
    seconds_per_char: f64,
    sample_rate: u32,
}

impl MockSynthesisProvider {
    /// Creates a mock that succeeds instantly
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: true,
            fail: false,
            delay: Duration::ZERO,
            seconds_per_char: 0.05,
            sample_rate: audio::RECOGNIZER_SAMPLE_RATE,
        }
    }

    /// Marks the provider unavailable (e.g. missing credentials)
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Makes every synthesis attempt fail
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Adds latency before responding, for timeout tests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets how much audio a character of input produces
    pub fn with_seconds_per_char(mut self, seconds: f64) -> Self {
        self.seconds_per_char = seconds;
        self
    }
}

#[async_trait]
impl SynthesisProvider for MockSynthesisProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> ProviderResult<SynthesizedAudio> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(ProviderError::RequestFailed(format!(
                "{} is scripted to fail",
                self.name
            )));
        }

        let duration_sec =
            (request.text.chars().count() as f64 * self.seconds_per_char / request.speed as f64)
                .max(0.01);
        let wav_bytes = audio::silence_wav(duration_sec, self.sample_rate)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(SynthesizedAudio {
            wav_bytes,
            sample_rate: self.sample_rate,
            duration_sec,
            provider: self.name.clone(),
            generation_time_ms: self.delay.as_millis() as u64,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
