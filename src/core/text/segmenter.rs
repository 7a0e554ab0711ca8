//! Text Segmenter
//!
//! Splits normalized text into ordered sections that respect the synthesis
//! provider's per-request length limit. Splits happen only at sentence or
//! whitespace boundaries, and concatenating all section texts in order
//! reproduces the input byte-for-byte, separators included.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::SectionIndex;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during segmentation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    /// A single whitespace-delimited token exceeds the section limit and
    /// cannot be split
    #[error("Token '{token}' is {length} characters, exceeding the section limit of {max_chars}")]
    TokenTooLong {
        token: String,
        length: usize,
        max_chars: usize,
    },

    /// The section limit itself is unusable
    #[error("Section limit must be greater than 0")]
    InvalidLimit,
}

/// Result type for segmentation operations
pub type SegmentationResult<T> = Result<T, SegmentationError>;

// =============================================================================
// Section
// =============================================================================

/// A bounded-length slice of the source text, synthesized and recognized
/// independently of its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Position of this section within the request
    pub index: SectionIndex,
    /// Exact slice of the normalized source text, separators included
    pub text: String,
    /// Character offset of this slice within the source text
    pub char_offset: usize,
}

impl Section {
    /// Length of the section text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

// =============================================================================
// Segmentation
// =============================================================================

/// Splits `text` into sections of at most `max_chars` characters.
///
/// Whole sentences are packed greedily; a sentence that cannot fit in any
/// section on its own is split at whitespace boundaries instead. A section
/// always ends at a boundary, carrying the separator that follows its last
/// word, so the only case where a section exceeds `max_chars` is a lone
/// word of exactly `max_chars` characters plus its trailing separator.
///
/// Fails with [`SegmentationError::TokenTooLong`] if any single
/// whitespace-delimited token is longer than `max_chars`.
pub fn segment(text: &str, max_chars: usize) -> SegmentationResult<Vec<Section>> {
    if max_chars == 0 {
        return Err(SegmentationError::InvalidLimit);
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    // Decompose into atoms that partition the text exactly: sentences that
    // fit the limit stay whole, oversized sentences break into word spans.
    let mut atoms: Vec<&str> = Vec::new();
    for sentence in split_sentence_spans(text) {
        if sentence.chars().count() <= max_chars {
            atoms.push(sentence);
        } else {
            for span in split_word_spans(sentence) {
                let word_len = span.trim().chars().count();
                if word_len > max_chars {
                    return Err(SegmentationError::TokenTooLong {
                        token: span.trim().to_string(),
                        length: word_len,
                        max_chars,
                    });
                }
                atoms.push(span);
            }
        }
    }

    let mut sections = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    let mut offset = 0usize;

    for atom in atoms {
        let atom_len = atom.chars().count();
        if !current.is_empty() && current_len + atom_len > max_chars {
            sections.push(Section {
                index: sections.len(),
                text: std::mem::take(&mut current),
                char_offset: offset,
            });
            offset += current_len;
            current_len = 0;
        }
        current.push_str(atom);
        current_len += atom_len;
    }

    if !current.is_empty() {
        sections.push(Section {
            index: sections.len(),
            text: current,
            char_offset: offset,
        });
    }

    Ok(sections)
}

/// Partitions text into sentence spans.
///
/// A sentence ends after a run of `.`, `!` or `?` followed by whitespace; the
/// whitespace run belongs to the sentence it terminates. The concatenation of
/// all spans is the input.
fn split_sentence_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut in_terminator = false;
    let mut in_trailing_ws = false;

    for (idx, ch) in text.char_indices() {
        if in_trailing_ws {
            if !ch.is_whitespace() {
                spans.push(&text[start..idx]);
                start = idx;
                in_trailing_ws = false;
                in_terminator = false;
            }
            continue;
        }
        if matches!(ch, '.' | '!' | '?') {
            in_terminator = true;
        } else if in_terminator && ch.is_whitespace() {
            in_trailing_ws = true;
        } else {
            in_terminator = false;
        }
    }
    if start < text.len() {
        spans.push(&text[start..]);
    }
    spans
}

/// Partitions text into word spans (word plus its trailing whitespace run).
///
/// Leading whitespace, if any, is attached to the first span. The
/// concatenation of all spans is the input.
fn split_word_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut prev_was_ws = true;
    let mut seen_word = false;

    for (idx, ch) in text.char_indices() {
        let is_ws = ch.is_whitespace();
        if !is_ws && prev_was_ws && seen_word {
            spans.push(&text[start..idx]);
            start = idx;
        }
        seen_word |= !is_ws;
        prev_was_ws = is_ws;
    }
    if start < text.len() {
        spans.push(&text[start..]);
    }
    spans
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(sections: &[Section]) -> String {
        sections.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_empty_text() {
        assert!(segment("", 100).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_limit() {
        assert_eq!(segment("hello", 0), Err(SegmentationError::InvalidLimit));
    }

    #[test]
    fn test_single_section() {
        let sections = segment("Hello world.", 100).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].index, 0);
        assert_eq!(sections[0].text, "Hello world.");
        assert_eq!(sections[0].char_offset, 0);
    }

    #[test]
    fn test_round_trip_exact() {
        let text = "First sentence. Second one!  Third,\nwith a newline? And a tail";
        let sections = segment(text, 20).unwrap();
        assert!(sections.len() > 1);
        assert_eq!(reassemble(&sections), text);
    }

    #[test]
    fn test_round_trip_preserves_odd_whitespace() {
        let text = "alpha  beta\t\tgamma   delta epsilon zeta";
        let sections = segment(text, 12).unwrap();
        assert_eq!(reassemble(&sections), text);
    }

    #[test]
    fn test_splits_at_sentence_boundaries_when_possible() {
        let text = "One two three. Four five six. Seven eight nine.";
        let sections = segment(text, 17).unwrap();
        // Each sentence fits alone but no two fit together
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].text, "One two three. ");
        assert_eq!(sections[1].text, "Four five six. ");
        assert_eq!(sections[2].text, "Seven eight nine.");
    }

    #[test]
    fn test_oversized_sentence_splits_at_words() {
        let text = "aaaa bbbb cccc dddd";
        let sections = segment(text, 10).unwrap();
        assert_eq!(reassemble(&sections), text);
        for section in &sections {
            assert!(section.text.trim().chars().count() <= 10);
        }
    }

    #[test]
    fn test_token_too_long() {
        let err = segment("short superduperlongtoken end", 10).unwrap_err();
        assert_eq!(
            err,
            SegmentationError::TokenTooLong {
                token: "superduperlongtoken".to_string(),
                length: 19,
                max_chars: 10,
            }
        );
    }

    #[test]
    fn test_char_offsets_are_cumulative() {
        let text = "One two three. Four five six. Seven eight nine.";
        let sections = segment(text, 16).unwrap();
        let mut expected = 0;
        for section in &sections {
            assert_eq!(section.char_offset, expected);
            expected += section.char_len();
        }
        assert_eq!(expected, text.chars().count());
    }

    #[test]
    fn test_indices_ordered() {
        let text = "a b c d e f g h i j k l m n o p";
        let sections = segment(text, 8).unwrap();
        for (i, section) in sections.iter().enumerate() {
            assert_eq!(section.index, i);
        }
    }

    #[test]
    fn test_unicode_counts_chars_not_bytes() {
        // Each word is 4 chars but more bytes
        let text = "héllo wörld agaïn";
        let sections = segment(text, 6).unwrap();
        assert_eq!(reassemble(&sections), text);
        assert_eq!(sections.len(), 3);
    }
}
