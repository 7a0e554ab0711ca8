//! Narracap Error Definitions
//!
//! Aggregates the module-scoped error types into the single failure type a
//! pipeline run surfaces to its caller.

use thiserror::Error;

use super::audio::AudioError;
use super::config::ConfigError;
use super::synthesis::SynthesisError;
use super::text::SegmentationError;
use super::timeline::StitchError;

/// Top-level pipeline error
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Text could not be segmented (a single token exceeds the section limit)
    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    /// Every fallback provider failed for a section; the request is aborted
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// Timeline monotonicity broke in a way clamping could not repair
    #[error(transparent)]
    Stitch(#[from] StitchError),

    /// Invalid or unusable configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Audio file handling failed
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source text is unusable (e.g. too few words after normalization)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The request was cancelled before completion
    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Pipeline result type
pub type PipelineResult<T> = Result<T, PipelineError>;
