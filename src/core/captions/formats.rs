//! Caption Exporters
//!
//! Writes grouped cues as SRT (SubRip) or WebVTT, and the plain-text
//! transcript companion file that accompanies every finished narration.

use std::path::Path;

use super::emitter::CaptionCue;

// =============================================================================
// SRT Format
// =============================================================================

/// Exports cues to SRT format
///
/// ```text
/// 1
/// 00:00:01,000 --> 00:00:04,000
/// First caption text
/// ```
pub fn export_srt(cues: &[CaptionCue]) -> String {
    let mut output = String::new();

    for (index, cue) in cues.iter().enumerate() {
        output.push_str(&format!("{}\n", index + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(cue.start_sec),
            format_srt_timestamp(cue.end_sec)
        ));
        output.push_str(&cue.text);
        output.push_str("\n\n");
    }

    output.trim_end().to_string()
}

/// Formats seconds as an SRT timestamp (00:00:00,000)
fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, ms)
}

// =============================================================================
// VTT Format
// =============================================================================

/// Exports cues to WebVTT format
pub fn export_vtt(cues: &[CaptionCue]) -> String {
    let mut output = String::from("WEBVTT\n\n");

    for cue in cues {
        output.push_str(&format!(
            "{} --> {}\n",
            format_vtt_timestamp(cue.start_sec),
            format_vtt_timestamp(cue.end_sec)
        ));
        output.push_str(&cue.text);
        output.push_str("\n\n");
    }

    output.trim_end().to_string()
}

/// Formats seconds as a VTT timestamp (00:00:00.000)
fn format_vtt_timestamp(seconds: f64) -> String {
    format_srt_timestamp(seconds).replace(',', ".")
}

// =============================================================================
// Transcript
// =============================================================================

/// Writes the plain-text transcript companion file
pub fn write_transcript(path: &Path, transcript: &str) -> std::io::Result<()> {
    std::fs::write(path, transcript)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(text: &str, start: f64, end: f64) -> CaptionCue {
        CaptionCue {
            text: text.to_string(),
            start_sec: start,
            end_sec: end,
        }
    }

    #[test]
    fn test_srt_timestamp_format() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(1.5), "00:00:01,500");
        assert_eq!(format_srt_timestamp(61.25), "00:01:01,250");
        assert_eq!(format_srt_timestamp(3661.999), "01:01:01,999");
    }

    #[test]
    fn test_export_srt() {
        let cues = vec![cue("First caption", 0.0, 2.5), cue("Second one", 2.5, 5.0)];

        let srt = export_srt(&cues);
        let expected = "1\n00:00:00,000 --> 00:00:02,500\nFirst caption\n\n2\n00:00:02,500 --> 00:00:05,000\nSecond one";
        assert_eq!(srt, expected);
    }

    #[test]
    fn test_export_vtt() {
        let cues = vec![cue("Hello there", 1.0, 3.0)];

        let vtt = export_vtt(&cues);
        assert!(vtt.starts_with("WEBVTT\n\n"));
        assert!(vtt.contains("00:00:01.000 --> 00:00:03.000"));
        assert!(vtt.contains("Hello there"));
    }

    #[test]
    fn test_export_empty() {
        assert_eq!(export_srt(&[]), "");
        assert_eq!(export_vtt(&[]), "WEBVTT");
    }

    #[test]
    fn test_write_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.txt");

        write_transcript(&path, "Hello world").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello world");
    }
}
