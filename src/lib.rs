//! Narracap Core Library
//!
//! Speech-caption synchronization engine. Narrates text through an ordered
//! chain of TTS providers, re-times the original text against speech
//! recognition output, and produces a monotonic global caption timeline plus
//! the concatenated narration audio for an external video renderer.
//!
//! The library owns segmentation, synthesis/recognition adapters, word-level
//! alignment, and timeline stitching. Everything downstream of the timeline
//! (frame compositing, encoding, UI) lives outside this crate.

pub mod core;

pub use crate::core::pipeline::{NarrationOutput, NarrationPipeline, NarrationRequest};
pub use crate::core::{PipelineError, PipelineResult};

/// Initializes the global tracing subscriber.
///
/// Filter is taken from `RUST_LOG` when set (e.g. `narracap=debug`),
/// defaulting to `info`. Safe to call once per process; subsequent calls are
/// ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
