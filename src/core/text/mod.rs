//! Text Preparation Module
//!
//! Normalization and segmentation of source text ahead of synthesis.
//!
//! Normalization is a pure function applied exactly once per request,
//! upstream of both segmentation and synthesis. The same normalized text that
//! providers speak is the text that gets tokenized for alignment; re-applying
//! normalization mid-pipeline is a correctness violation (it historically
//! caused caption drift).

mod normalize;
mod segmenter;
mod tokens;

pub use normalize::{normalize_text, word_count};
pub use segmenter::{segment, Section, SegmentationError, SegmentationResult};
pub use tokens::{normalize_for_comparison, tokenize_section, OriginalToken};
