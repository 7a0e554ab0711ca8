//! Word Alignment Module
//!
//! The algorithmic core of the engine: reconciles each section's original
//! tokens with the recognizer's (possibly different) transcription of the
//! synthesized audio, yielding one timed entry per token regardless of what
//! the recognizer dropped, merged, substituted, or hallucinated.

mod aligner;
mod matcher;
mod models;

pub use aligner::align_section;
pub use matcher::{align_sequences, AlignmentOp};
pub use models::{AlignedWord, AlignmentStatus, SectionAlignment};
