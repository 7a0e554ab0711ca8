//! Timeline Stitcher
//!
//! Concatenates per-section timelines into one absolute timeline using
//! cumulative audio-duration offsets, applies the global timing correction,
//! and enforces monotonicity. Inherently sequential: it needs every
//! section's alignment, in section order, before producing output.

use thiserror::Error;
use tracing::warn;

use super::models::{GlobalTimeline, SectionTimeline};
use crate::core::TimeSec;

// =============================================================================
// Error Types
// =============================================================================

/// A monotonicity break that survived clamping.
///
/// Should not occur given the clamping rules; retained as a defensive
/// assertion because a silently broken timeline corrupts every caption
/// downstream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StitchError {
    #[error(
        "Timeline monotonicity violated at entry {index}: start {start:.3}s precedes previous start {previous:.3}s"
    )]
    InvariantViolation {
        index: usize,
        start: TimeSec,
        previous: TimeSec,
    },

    #[error("Non-finite timestamp at entry {index}")]
    NonFiniteTime { index: usize },
}

/// Result type for stitching operations
pub type StitchResult<T> = Result<T, StitchError>;

// =============================================================================
// Stitching
// =============================================================================

/// Stitches section timelines into a [`GlobalTimeline`].
///
/// Sections are processed in section order regardless of the order they
/// finished in. Each section's words are shifted by the summed durations of
/// the sections before it, then `global_offset_seconds` is applied uniformly
/// with negative starts clamped to zero (and `end` never below `start`).
pub fn stitch(
    mut sections: Vec<SectionTimeline>,
    global_offset_seconds: f64,
) -> StitchResult<GlobalTimeline> {
    // Completion order of concurrent section work is irrelevant; only the
    // section order matters.
    sections.sort_by_key(|s| s.alignment.section_index);

    let mut words = Vec::with_capacity(sections.iter().map(|s| s.alignment.words.len()).sum());
    let mut cumulative_offset: TimeSec = 0.0;
    let mut prev_end: TimeSec = 0.0;
    let mut clamped = 0usize;

    for section in &mut sections {
        for word in section.alignment.words.drain(..) {
            let mut start = word.start_sec + cumulative_offset;
            let mut end = word.end_sec + cumulative_offset;

            // Audio-duration accounting and recognized timing can disagree
            // (e.g. trailing silence trimmed differently); clamp forward.
            if start < prev_end {
                start = prev_end;
                clamped += 1;
            }
            end = end.max(start);
            prev_end = end;

            words.push(crate::core::alignment::AlignedWord {
                start_sec: start,
                end_sec: end,
                ..word
            });
        }
        cumulative_offset += section.audio_duration_sec;
    }

    if clamped > 0 {
        warn!(clamped, "Cross-section stitching clamped overlapping entries");
    }

    // Uniform timing correction, clamped at zero
    if global_offset_seconds != 0.0 {
        for word in &mut words {
            let start = (word.start_sec + global_offset_seconds).max(0.0);
            let end = (word.end_sec + global_offset_seconds).max(start);
            word.start_sec = start;
            word.end_sec = end;
        }
    }

    verify_monotonic(&words)?;

    Ok(GlobalTimeline::new(words, cumulative_offset))
}

fn verify_monotonic(words: &[crate::core::alignment::AlignedWord]) -> StitchResult<()> {
    let mut previous = 0.0;
    for (index, word) in words.iter().enumerate() {
        if !word.start_sec.is_finite() || !word.end_sec.is_finite() {
            return Err(StitchError::NonFiniteTime { index });
        }
        if word.start_sec < previous {
            return Err(StitchError::InvariantViolation {
                index,
                start: word.start_sec,
                previous,
            });
        }
        previous = word.start_sec;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
