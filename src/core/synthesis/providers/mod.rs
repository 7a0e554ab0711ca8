//! Concrete Synthesis Providers
//!
//! HTTP-backed TTS providers, compiled when the `remote-providers` feature is
//! enabled. Each one implements [`super::SynthesisProvider`] and is selected
//! through the ordered fallback list in `TimingConfig`.

#[cfg(feature = "remote-providers")]
mod coqui;
#[cfg(feature = "remote-providers")]
mod elevenlabs;
#[cfg(feature = "remote-providers")]
mod speecht5;

#[cfg(feature = "remote-providers")]
pub use coqui::CoquiProvider;
#[cfg(feature = "remote-providers")]
pub use elevenlabs::ElevenLabsProvider;
#[cfg(feature = "remote-providers")]
pub use speecht5::SpeechT5Provider;

#[cfg(feature = "remote-providers")]
use std::sync::Arc;

#[cfg(feature = "remote-providers")]
use super::{ProviderConfig, ProviderRegistry};

/// Builds a registry holding every remote provider with the given settings.
///
/// Providers missing credentials still register; they report themselves
/// unavailable and the fallback chain skips them.
#[cfg(feature = "remote-providers")]
pub fn default_registry(
    elevenlabs: ProviderConfig,
    coqui: ProviderConfig,
    speecht5: ProviderConfig,
) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(ElevenLabsProvider::new(elevenlabs)));
    registry.register(Arc::new(CoquiProvider::new(coqui)));
    registry.register(Arc::new(SpeechT5Provider::new(speecht5)));
    registry
}
