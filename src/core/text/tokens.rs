//! Original Token Derivation
//!
//! Tokenizes section text into the display units the engine guarantees
//! timing for. Display text keeps punctuation and casing; the normalized
//! form exists only for comparison against recognizer output.

use serde::{Deserialize, Serialize};

/// A whitespace-delimited unit of the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalToken {
    /// Exact text as it should be displayed, punctuation included
    pub text: String,
    /// Lowercased, punctuation-stripped form used for alignment comparison
    pub normalized: String,
    /// Position of this token within its section
    pub index_in_section: usize,
}

impl OriginalToken {
    /// Display length in characters, used for proportional timing
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Normalizes a word for comparison: lowercase, alphanumeric characters only.
///
/// Pure-punctuation tokens normalize to the empty string; the aligner still
/// emits a timing entry for them.
pub fn normalize_for_comparison(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Derives the ordered token list for one section.
///
/// Tokens are split on whitespace only; punctuation stays attached to its
/// word so captions display the source text verbatim.
pub fn tokenize_section(text: &str) -> Vec<OriginalToken> {
    text.split_whitespace()
        .enumerate()
        .map(|(index, word)| OriginalToken {
            text: word.to_string(),
            normalized: normalize_for_comparison(word),
            index_in_section: index,
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_preserves_display_text() {
        let tokens = tokenize_section("Hello, world! It's fine.");
        let display: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(display, vec!["Hello,", "world!", "It's", "fine."]);
    }

    #[test]
    fn test_tokenize_normalized_forms() {
        let tokens = tokenize_section("Hello, world! It's fine.");
        let normalized: Vec<&str> = tokens.iter().map(|t| t.normalized.as_str()).collect();
        assert_eq!(normalized, vec!["hello", "world", "its", "fine"]);
    }

    #[test]
    fn test_tokenize_indices() {
        let tokens = tokenize_section("a b c");
        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.index_in_section, i);
        }
    }

    #[test]
    fn test_tokenize_collapses_whitespace_runs() {
        let tokens = tokenize_section("  one\t\ttwo \n three  ");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "one");
        assert_eq!(tokens[2].text, "three");
    }

    #[test]
    fn test_pure_punctuation_token() {
        let tokens = tokenize_section("wait - no");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "-");
        assert_eq!(tokens[1].normalized, "");
    }

    #[test]
    fn test_normalize_unicode_lowercase() {
        assert_eq!(normalize_for_comparison("Déjà-vu!"), "déjàvu");
    }

    #[test]
    fn test_char_len() {
        let tokens = tokenize_section("héllo");
        assert_eq!(tokens[0].char_len(), 5);
    }
}
