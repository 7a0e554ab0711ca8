//! Caption Emitter
//!
//! Exposes the global timeline to the renderer as a raw per-word stream or
//! grouped into fixed-size/fixed-duration display cues.

use serde::{Deserialize, Serialize};

use crate::core::alignment::AlignedWord;
use crate::core::timeline::GlobalTimeline;
use crate::core::TimeSec;

/// A display chunk of consecutive words sharing one caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionCue {
    /// Space-joined display text
    pub text: String,
    /// Absolute start time in seconds
    pub start_sec: TimeSec,
    /// Absolute end time in seconds
    pub end_sec: TimeSec,
}

/// How words are grouped into cues.
///
/// These are renderer-side defaults, not engine semantics; a renderer that
/// wants different chunking consumes the raw word stream instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingPolicy {
    /// Maximum words per cue
    pub max_words: usize,
    /// Maximum cue duration in seconds
    pub max_duration_sec: TimeSec,
}

impl Default for GroupingPolicy {
    fn default() -> Self {
        Self {
            max_words: 5,
            max_duration_sec: 3.0,
        }
    }
}

/// Read-only caption view over a finished timeline
pub struct CaptionEmitter<'a> {
    timeline: &'a GlobalTimeline,
}

impl<'a> CaptionEmitter<'a> {
    /// Wraps a timeline for emission
    pub fn new(timeline: &'a GlobalTimeline) -> Self {
        Self { timeline }
    }

    /// The raw per-word stream
    pub fn words(&self) -> &[AlignedWord] {
        self.timeline.words()
    }

    /// Groups the word stream into display cues under the given policy.
    ///
    /// A cue closes once it holds `max_words` words or the next word would
    /// stretch it past `max_duration_sec`.
    pub fn cues(&self, policy: GroupingPolicy) -> Vec<CaptionCue> {
        let max_words = policy.max_words.max(1);
        let mut cues = Vec::new();

        let mut texts: Vec<&str> = Vec::new();
        let mut cue_start = 0.0;
        let mut cue_end = 0.0;

        for word in self.timeline.words() {
            let would_overflow = !texts.is_empty()
                && (texts.len() >= max_words
                    || word.end_sec - cue_start > policy.max_duration_sec);
            if would_overflow {
                cues.push(CaptionCue {
                    text: texts.join(" "),
                    start_sec: cue_start,
                    end_sec: cue_end,
                });
                texts.clear();
            }
            if texts.is_empty() {
                cue_start = word.start_sec;
            }
            texts.push(word.display_text());
            cue_end = word.end_sec;
        }

        if !texts.is_empty() {
            cues.push(CaptionCue {
                text: texts.join(" "),
                start_sec: cue_start,
                end_sec: cue_end,
            });
        }

        cues
    }

    /// Plain-text transcript of the narration
    pub fn transcript(&self) -> String {
        self.timeline
            .words()
            .iter()
            .map(|w| w.display_text())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::{align_section, SectionAlignment};
    use crate::core::text::tokenize_section;
    use crate::core::timeline::{stitch, SectionTimeline};

    fn timeline_for(text: &str, duration: f64) -> GlobalTimeline {
        let tokens = tokenize_section(text);
        let alignment: SectionAlignment = align_section(0, &tokens, &[], duration);
        stitch(
            vec![SectionTimeline {
                alignment,
                audio_duration_sec: duration,
            }],
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn test_words_view_matches_timeline() {
        let timeline = timeline_for("one two three", 3.0);
        let emitter = CaptionEmitter::new(&timeline);
        assert_eq!(emitter.words().len(), 3);
    }

    #[test]
    fn test_cues_group_by_word_count() {
        let timeline = timeline_for("a b c d e f g", 7.0);
        let emitter = CaptionEmitter::new(&timeline);

        let cues = emitter.cues(GroupingPolicy {
            max_words: 3,
            max_duration_sec: 100.0,
        });

        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].text, "a b c");
        assert_eq!(cues[1].text, "d e f");
        assert_eq!(cues[2].text, "g");
    }

    #[test]
    fn test_cues_group_by_duration() {
        let timeline = timeline_for("aa bb cc dd", 4.0);
        let emitter = CaptionEmitter::new(&timeline);

        // Each word is ~1s; cues cap at 2s
        let cues = emitter.cues(GroupingPolicy {
            max_words: 100,
            max_duration_sec: 2.0,
        });

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "aa bb");
        assert_eq!(cues[1].text, "cc dd");
    }

    #[test]
    fn test_cue_times_span_member_words() {
        let timeline = timeline_for("one two three four", 4.0);
        let emitter = CaptionEmitter::new(&timeline);

        let cues = emitter.cues(GroupingPolicy {
            max_words: 2,
            max_duration_sec: 100.0,
        });

        let words = emitter.words();
        assert_eq!(cues[0].start_sec, words[0].start_sec);
        assert_eq!(cues[0].end_sec, words[1].end_sec);
        assert_eq!(cues[1].start_sec, words[2].start_sec);
    }

    #[test]
    fn test_empty_timeline_yields_no_cues() {
        let timeline = GlobalTimeline::default();
        let emitter = CaptionEmitter::new(&timeline);
        assert!(emitter.cues(GroupingPolicy::default()).is_empty());
        assert_eq!(emitter.transcript(), "");
    }

    #[test]
    fn test_transcript_joins_display_text() {
        let timeline = timeline_for("Hello, world! Fine.", 2.0);
        let emitter = CaptionEmitter::new(&timeline);
        assert_eq!(emitter.transcript(), "Hello, world! Fine.");
    }
}
