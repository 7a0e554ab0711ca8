//! Recognition Output Models

use serde::{Deserialize, Serialize};

use crate::core::TimeSec;

/// A word as reported by the speech recognizer, timed relative to the start
/// of its audio segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWord {
    /// Recognized text (may differ from the original token)
    pub text: String,
    /// Start time within the segment, in seconds
    pub start_sec: TimeSec,
    /// End time within the segment, in seconds
    pub end_sec: TimeSec,
    /// Recognizer confidence, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl RawWord {
    /// Creates a word without confidence information
    pub fn new(text: impl Into<String>, start_sec: TimeSec, end_sec: TimeSec) -> Self {
        Self {
            text: text.into(),
            start_sec,
            end_sec,
            confidence: None,
        }
    }

    /// Sets the confidence
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Duration of the spoken word in seconds
    pub fn duration(&self) -> TimeSec {
        self.end_sec - self.start_sec
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_word_creation() {
        let word = RawWord::new("hello", 0.5, 0.9);
        assert_eq!(word.text, "hello");
        assert_eq!(word.start_sec, 0.5);
        assert_eq!(word.end_sec, 0.9);
        assert!(word.confidence.is_none());
        assert!((word.duration() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_with_confidence() {
        let word = RawWord::new("hello", 0.0, 0.3).with_confidence(0.98);
        assert_eq!(word.confidence, Some(0.98));
    }

    #[test]
    fn test_serialization_camel_case() {
        let word = RawWord::new("hi", 0.0, 0.2);
        let json = serde_json::to_string(&word).unwrap();
        assert!(json.contains("startSec"));
        assert!(json.contains("endSec"));
        assert!(!json.contains("confidence"));
    }
}
