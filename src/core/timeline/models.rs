//! Timeline Models

use serde::{Deserialize, Serialize};

use crate::core::alignment::{AlignedWord, SectionAlignment};
use crate::core::TimeSec;

/// One section's aligned words paired with its audio duration, the input
/// unit for stitching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTimeline {
    /// Per-token alignment for the section
    pub alignment: SectionAlignment,
    /// Duration of the section's audio segment in seconds
    pub audio_duration_sec: TimeSec,
}

/// The finished, renderer-facing timeline: every original token across all
/// sections with absolute display times.
///
/// Invariant: `start_sec` values are non-decreasing over the whole sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalTimeline {
    /// All words in section order, absolutely timed
    words: Vec<AlignedWord>,
    /// Total duration of the concatenated narration audio in seconds
    total_duration_sec: TimeSec,
}

impl GlobalTimeline {
    pub(crate) fn new(words: Vec<AlignedWord>, total_duration_sec: TimeSec) -> Self {
        Self {
            words,
            total_duration_sec,
        }
    }

    /// Read-only view of the word stream
    pub fn words(&self) -> &[AlignedWord] {
        &self.words
    }

    /// Total narration duration in seconds
    pub fn total_duration_sec(&self) -> TimeSec {
        self.total_duration_sec
    }

    /// Number of timed words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the timeline has no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates `(display_text, start, end)` tuples, the renderer contract
    pub fn iter_display(&self) -> impl Iterator<Item = (&str, TimeSec, TimeSec)> {
        self.words
            .iter()
            .map(|w| (w.display_text(), w.start_sec, w.end_sec))
    }
}
