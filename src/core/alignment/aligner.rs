//! Word Aligner
//!
//! Produces exactly one timed entry per original token for a section,
//! reconciling the recognizer's view of the audio with the text the captions
//! must display. Matched tokens take recognizer timing directly; dropped
//! tokens are interpolated between their matched neighbors; with no
//! recognition data at all, the section duration is distributed across the
//! tokens proportionally to character length.

use tracing::warn;

use super::matcher::{align_sequences, AlignmentOp};
use super::models::{AlignedWord, AlignmentStatus, SectionAlignment};
use crate::core::recognition::RawWord;
use crate::core::text::OriginalToken;
use crate::core::{SectionIndex, TimeSec};

/// Aligns one section's tokens against its recognized words.
///
/// `duration_sec` is the total length of the section's audio, used for the
/// estimated fallback and as a ceiling for trailing extrapolation.
pub fn align_section(
    section_index: SectionIndex,
    tokens: &[OriginalToken],
    words: &[RawWord],
    duration_sec: TimeSec,
) -> SectionAlignment {
    if tokens.is_empty() {
        return SectionAlignment {
            section_index,
            words: Vec::new(),
            clamped_count: 0,
        };
    }

    if words.is_empty() {
        return estimate_section(section_index, tokens, duration_sec);
    }

    let token_forms: Vec<&str> = tokens.iter().map(|t| t.normalized.as_str()).collect();
    let word_forms: Vec<String> = words
        .iter()
        .map(|w| crate::core::text::normalize_for_comparison(&w.text))
        .collect();
    let word_refs: Vec<&str> = word_forms.iter().map(String::as_str).collect();

    let ops = align_sequences(&token_forms, &word_refs);

    // Paired intervals per token; deletions stay None and are filled below.
    // Inserted recognized words contribute nothing.
    let mut intervals: Vec<Option<(TimeSec, TimeSec)>> = vec![None; tokens.len()];
    let mut paired = vec![false; tokens.len()];
    for op in &ops {
        if let AlignmentOp::Match {
            token_index,
            word_index,
        } = op
        {
            let w = &words[*word_index];
            intervals[*token_index] = Some((w.start_sec, w.end_sec.max(w.start_sec)));
            paired[*token_index] = true;
        }
    }

    if intervals.iter().all(Option::is_none) {
        // The recognizer produced words but none of them paired up; treat it
        // the same as having no recognition data.
        return estimate_section(section_index, tokens, duration_sec);
    }

    fill_deletion_runs(tokens, &mut intervals, duration_sec);

    let mut aligned: Vec<AlignedWord> = Vec::with_capacity(tokens.len());
    let mut clamped_count = 0usize;

    for (idx, token) in tokens.iter().enumerate() {
        let (start, end) = intervals[idx].expect("every token interval is resolved");
        let status = if paired[idx] {
            AlignmentStatus::Matched
        } else {
            AlignmentStatus::Interpolated
        };

        let prev_end = aligned.last().map(|w: &AlignedWord| w.end_sec).unwrap_or(0.0);
        let mut start = start;
        if start < prev_end {
            start = prev_end;
            clamped_count += 1;
        }
        let end = end.max(start);

        aligned.push(AlignedWord {
            token: token.clone(),
            start_sec: start,
            end_sec: end,
            section_index,
            status,
        });
    }

    debug_assert_eq!(aligned.len(), tokens.len());
    if clamped_count > 0 {
        warn!(
            section = section_index,
            clamped = clamped_count,
            "Alignment produced non-monotonic starts; clamped"
        );
    }

    SectionAlignment {
        section_index,
        words: aligned,
        clamped_count,
    }
}

/// Distributes the section duration across all tokens proportionally to
/// character length. Every entry is marked estimated.
fn estimate_section(
    section_index: SectionIndex,
    tokens: &[OriginalToken],
    duration_sec: TimeSec,
) -> SectionAlignment {
    let duration = duration_sec.max(0.0);
    let total_chars: usize = tokens.iter().map(|t| t.char_len()).sum();
    let total_chars = total_chars.max(1);

    let mut words = Vec::with_capacity(tokens.len());
    let mut cursor = 0.0;
    for token in tokens {
        let width = duration * token.char_len() as f64 / total_chars as f64;
        words.push(AlignedWord {
            token: token.clone(),
            start_sec: cursor,
            end_sec: cursor + width,
            section_index,
            status: AlignmentStatus::Estimated,
        });
        cursor += width;
    }

    SectionAlignment {
        section_index,
        words,
        clamped_count: 0,
    }
}

/// Resolves every `None` interval by interpolating runs of consecutive
/// deletions between their matched neighbors, or extrapolating at the
/// section edges.
fn fill_deletion_runs(
    tokens: &[OriginalToken],
    intervals: &mut [Option<(TimeSec, TimeSec)>],
    duration_sec: TimeSec,
) {
    let len = intervals.len();
    let mut idx = 0;

    while idx < len {
        if intervals[idx].is_some() {
            idx += 1;
            continue;
        }

        // Find the run [run_start, run_end] of consecutive unmatched tokens
        let run_start = idx;
        let mut run_end = idx;
        while run_end + 1 < len && intervals[run_end + 1].is_none() {
            run_end += 1;
        }

        let prev = run_start
            .checked_sub(1)
            .and_then(|p| intervals[p].map(|(_, end)| (p, end)));
        let next = intervals
            .get(run_end + 1)
            .copied()
            .flatten()
            .map(|interval| (run_end + 1, interval));

        let weights: Vec<f64> = (run_start..=run_end)
            .map(|i| tokens[i].char_len().max(1) as f64)
            .collect();
        let total_weight: f64 = weights.iter().sum();

        match (prev, next) {
            (Some((_, prev_end)), Some((_, (next_start, _)))) => {
                // Split the enclosing gap proportionally to character length
                let gap = (next_start - prev_end).max(0.0);
                let mut cursor = prev_end;
                for (offset, weight) in weights.iter().enumerate() {
                    let width = gap * weight / total_weight;
                    intervals[run_start + offset] = Some((cursor, cursor + width));
                    cursor += width;
                }
            }
            (None, Some((next_idx, (next_start, next_end)))) => {
                // Leading run: walk backwards from the first matched word at
                // its per-character speaking rate, floored at zero.
                let rate = per_char_rate(&tokens[next_idx], next_start, next_end);
                let total: f64 = weights.iter().map(|w| w * rate).sum();
                let available = next_start.max(0.0);
                let scale = if total > available && total > 0.0 {
                    available / total
                } else {
                    1.0
                };
                let mut cursor = (next_start - total * scale).max(0.0);
                for (offset, weight) in weights.iter().enumerate() {
                    let width = weight * rate * scale;
                    intervals[run_start + offset] = Some((cursor, cursor + width));
                    cursor += width;
                }
            }
            (Some((prev_idx, prev_end)), None) => {
                // Trailing run: walk forwards from the last matched word,
                // capped at the section's audio duration when it is ahead.
                let (prev_start, _) = intervals[prev_idx].expect("prev is matched");
                let rate = per_char_rate(&tokens[prev_idx], prev_start, prev_end);
                let total: f64 = weights.iter().map(|w| w * rate).sum();
                let available = duration_sec - prev_end;
                let scale = if available > 0.0 && total > available {
                    available / total
                } else {
                    1.0
                };
                let mut cursor = prev_end;
                for (offset, weight) in weights.iter().enumerate() {
                    let width = weight * rate * scale;
                    intervals[run_start + offset] = Some((cursor, cursor + width));
                    cursor += width;
                }
            }
            (None, None) => unreachable!("all-deletion sections use estimated timing"),
        }

        idx = run_end + 1;
    }
}

/// Average per-character duration of a matched token's interval
fn per_char_rate(token: &OriginalToken, start: TimeSec, end: TimeSec) -> f64 {
    let width = (end - start).max(0.0);
    let chars = token.char_len().max(1) as f64;
    let rate = width / chars;
    if rate > 0.0 {
        rate
    } else {
        // Zero-width matched interval; fall back to a nominal speaking rate
        0.05
    }
}

// =============================================================================
// Tests
// =============================================================================
