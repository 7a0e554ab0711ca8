//! Alignment Output Models

use serde::{Deserialize, Serialize};

use crate::core::text::OriginalToken;
use crate::core::{SectionIndex, TimeSec};

/// How an aligned word's timing was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStatus {
    /// Timing taken directly from a recognized word
    Matched,
    /// Timing interpolated or extrapolated from matched neighbors
    Interpolated,
    /// Timing distributed across the section with no recognition data
    Estimated,
}

/// An original token annotated with a display interval.
///
/// Times are section-local until the stitcher shifts them onto the global
/// timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedWord {
    /// The source token this entry times
    pub token: OriginalToken,
    /// Interval start in seconds
    pub start_sec: TimeSec,
    /// Interval end in seconds; always >= start
    pub end_sec: TimeSec,
    /// Section the token belongs to
    pub section_index: SectionIndex,
    /// Provenance of the timing
    pub status: AlignmentStatus,
}

impl AlignedWord {
    /// Text to display for this word
    pub fn display_text(&self) -> &str {
        &self.token.text
    }

    /// Interval length in seconds
    pub fn duration(&self) -> TimeSec {
        self.end_sec - self.start_sec
    }
}

/// One section's aligned timeline plus alignment diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionAlignment {
    /// Section these words belong to
    pub section_index: SectionIndex,
    /// Exactly one entry per original token, in token order
    pub words: Vec<AlignedWord>,
    /// Number of entries whose start had to be clamped to restore
    /// monotonicity
    pub clamped_count: usize,
}

impl SectionAlignment {
    /// True when the whole section fell back to estimated timing
    pub fn is_estimated(&self) -> bool {
        !self.words.is_empty()
            && self
                .words
                .iter()
                .all(|w| w.status == AlignmentStatus::Estimated)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, index: usize) -> OriginalToken {
        OriginalToken {
            text: text.to_string(),
            normalized: text.to_lowercase(),
            index_in_section: index,
        }
    }

    fn word(text: &str, start: f64, end: f64, status: AlignmentStatus) -> AlignedWord {
        AlignedWord {
            token: token(text, 0),
            start_sec: start,
            end_sec: end,
            section_index: 0,
            status,
        }
    }

    #[test]
    fn test_display_and_duration() {
        let w = word("Hello,", 0.5, 0.9, AlignmentStatus::Matched);
        assert_eq!(w.display_text(), "Hello,");
        assert!((w.duration() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_is_estimated() {
        let estimated = SectionAlignment {
            section_index: 0,
            words: vec![
                word("a", 0.0, 0.5, AlignmentStatus::Estimated),
                word("b", 0.5, 1.0, AlignmentStatus::Estimated),
            ],
            clamped_count: 0,
        };
        assert!(estimated.is_estimated());

        let mixed = SectionAlignment {
            section_index: 0,
            words: vec![
                word("a", 0.0, 0.5, AlignmentStatus::Matched),
                word("b", 0.5, 1.0, AlignmentStatus::Estimated),
            ],
            clamped_count: 0,
        };
        assert!(!mixed.is_estimated());

        let empty = SectionAlignment {
            section_index: 0,
            words: vec![],
            clamped_count: 0,
        };
        assert!(!empty.is_estimated());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AlignmentStatus::Matched).unwrap(),
            "\"matched\""
        );
        assert_eq!(
            serde_json::from_str::<AlignmentStatus>("\"interpolated\"").unwrap(),
            AlignmentStatus::Interpolated
        );
    }
}
