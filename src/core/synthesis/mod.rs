//! Speech Synthesis Module
//!
//! Turns one section's text into an audio segment by walking an ordered list
//! of provider backends. Each attempt is bounded by the per-provider timeout
//! from `TimingConfig`; the first success wins. There are no retries beyond
//! the fallback chain - the chain is the retry policy.

mod models;
mod provider;
pub mod providers;

pub use models::{SynthesisRequest, SynthesizedAudio};
pub use provider::{
    MockSynthesisProvider, ProviderConfig, ProviderError, ProviderRegistry, ProviderResult,
    SynthesisProvider,
};

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::core::config::{ConfigError, ConfigResult, TimingConfig};
use crate::core::SectionIndex;

// =============================================================================
// Error Types
// =============================================================================

/// One failed provider attempt within a fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    /// Provider identifier
    pub provider: String,
    /// Why the attempt failed
    pub reason: String,
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider, self.reason)
    }
}

fn summarize(causes: &[ProviderFailure]) -> String {
    causes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Every provider in the fallback chain failed or timed out for a section.
///
/// Fatal to the whole request: sibling section work is cancelled and
/// temporary files are cleaned up.
#[derive(Error, Debug)]
#[error("All synthesis providers failed for section {section_index}: {}", summarize(.causes))]
pub struct SynthesisError {
    /// Section whose synthesis failed
    pub section_index: SectionIndex,
    /// Root cause from every attempted provider, in fallback order
    pub causes: Vec<ProviderFailure>,
}

// =============================================================================
// Synthesizer
// =============================================================================

/// Fallback-chain speech synthesizer
pub struct Synthesizer {
    chain: Vec<Arc<dyn SynthesisProvider>>,
    timeout: Duration,
}

impl Synthesizer {
    /// Resolves the configured fallback order against a provider registry.
    ///
    /// Fails if the order names a provider the registry does not know.
    pub fn from_config(config: &TimingConfig, registry: &ProviderRegistry) -> ConfigResult<Self> {
        if config.provider_fallback_order.is_empty() {
            return Err(ConfigError::EmptyFallbackOrder);
        }

        let mut chain = Vec::with_capacity(config.provider_fallback_order.len());
        for name in &config.provider_fallback_order {
            let provider = registry
                .get(name)
                .ok_or_else(|| ConfigError::UnknownProvider(name.clone()))?;
            chain.push(provider);
        }

        Ok(Self {
            chain,
            timeout: config.provider_timeout(),
        })
    }

    /// Provider names in fallback order
    pub fn provider_names(&self) -> Vec<&str> {
        self.chain.iter().map(|p| p.name()).collect()
    }

    /// Synthesizes one section, walking the fallback chain until a provider
    /// succeeds within its timeout.
    pub async fn synthesize_section(
        &self,
        section_index: SectionIndex,
        request: &SynthesisRequest,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        let mut causes = Vec::new();

        for provider in &self.chain {
            if !provider.is_available() {
                warn!(
                    provider = provider.name(),
                    section = section_index,
                    "Skipping unavailable synthesis provider"
                );
                causes.push(ProviderFailure {
                    provider: provider.name().to_string(),
                    reason: "provider not available".to_string(),
                });
                continue;
            }

            match tokio::time::timeout(self.timeout, provider.synthesize(request)).await {
                Ok(Ok(audio)) => {
                    info!(
                        provider = provider.name(),
                        section = section_index,
                        duration_sec = audio.duration_sec,
                        "Section synthesized"
                    );
                    return Ok(audio);
                }
                Ok(Err(e)) => {
                    warn!(
                        provider = provider.name(),
                        section = section_index,
                        error = %e,
                        "Synthesis provider failed, trying next in chain"
                    );
                    causes.push(ProviderFailure {
                        provider: provider.name().to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(_) => {
                    warn!(
                        provider = provider.name(),
                        section = section_index,
                        timeout_sec = self.timeout.as_secs_f64(),
                        "Synthesis provider timed out, trying next in chain"
                    );
                    causes.push(ProviderFailure {
                        provider: provider.name().to_string(),
                        reason: format!("timed out after {:.1}s", self.timeout.as_secs_f64()),
                    });
                }
            }
        }

        Err(SynthesisError {
            section_index,
            causes,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
