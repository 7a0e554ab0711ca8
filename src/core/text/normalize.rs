//! Text Normalization
//!
//! Replaces content that text-to-speech engines mangle (URLs, code, raw
//! data) with short spoken descriptions. The output is what gets segmented,
//! synthesized, and tokenized for alignment, so this must run exactly once
//! per request.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Compiled normalization pass
struct Normalizer {
    code_block: Regex,
    url_http: Regex,
    url_www: Regex,
    windows_path: Regex,
    unix_path: Regex,
    email: Regex,
    html_tag: Regex,
    data_structure: Regex,
    code_patterns: Vec<Regex>,
    special_chars: Regex,
    hex_value: Regex,
    ip_address: Regex,
    long_number: Regex,
}

impl Normalizer {
    fn new() -> Self {
        Self {
            code_block: Regex::new(r"```[\s\S]*?```").unwrap(),
            url_http: Regex::new(r#"https?://[^\s<>"]+"#).unwrap(),
            url_www: Regex::new(r#"www\.[^\s<>"]+"#).unwrap(),
            windows_path: Regex::new(
                r#"[a-zA-Z]:\\(?:[^\\/:*?"<>|\r\n]+\\)*[^\\/:*?"<>|\r\n]*"#,
            )
            .unwrap(),
            unix_path: Regex::new(r"/(?:[a-zA-Z0-9._-]+/)*[a-zA-Z0-9._-]+").unwrap(),
            email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap(),
            html_tag: Regex::new(r"</?[a-zA-Z]+[^>]*>").unwrap(),
            data_structure: Regex::new(r"[\{\[][\s\S]*?[\}\]]").unwrap(),
            code_patterns: [
                r"def\s+\w+",
                r"class\s+\w+",
                r"import\s+\w+",
                r"function\s+\w+",
                r"var\s+\w+",
                r"const\s+\w+",
                r"let\s+\w+",
                r"if\s*\(",
                r"while\s*\(",
                r"for\s*\(",
                r"\{\s*\n",
                r"\}\s*\n",
                r"return\s+\w+",
                r"\(\)\s*\{",
                r"\([^)]*\)\s*\{",
                r"\}\s*else\s*\{",
                r";\s*\}",
            ]
            .iter()
            .map(|p| Regex::new(p).unwrap())
            .collect(),
            special_chars: Regex::new(r#"[^\w\s,.!?;:'"-]{4,}"#).unwrap(),
            hex_value: Regex::new(r"\b0x[0-9a-fA-F]{2,}\b|#[0-9a-fA-F]{3,6}\b").unwrap(),
            ip_address: Regex::new(r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b").unwrap(),
            long_number: Regex::new(r"\b\d{6,}\b").unwrap(),
        }
    }

    fn apply(&self, text: &str) -> String {
        let text = self.code_block.replace_all(text, "[Code block is shown]");
        let text = self.url_http.replace_all(&text, "[A URL is shown]");
        let text = self.url_www.replace_all(&text, "[A URL is shown]");
        let text = self
            .windows_path
            .replace_all(&text, "[A file path is shown]");
        let text = self.unix_path.replace_all(&text, "[A file path is shown]");
        let text = self.email.replace_all(&text, "[An email address is shown]");
        let text = self.html_tag.replace_all(&text, "[HTML tag is shown]");

        // Braced/bracketed content is only treated as data when it looks like
        // serialized key-value pairs, so the placeholders themselves survive.
        let text = self.data_structure.replace_all(&text, |caps: &Captures| {
            let content = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            if content.contains("\":") || content.contains("\">") {
                "[Data structure is shown]".to_string()
            } else {
                content.to_string()
            }
        });

        let mut text = text.into_owned();
        for pattern in &self.code_patterns {
            text = pattern
                .replace_all(&text, "[Code syntax is shown]")
                .into_owned();
        }

        let text = self
            .special_chars
            .replace_all(&text, "[Special character sequence is shown]");
        let text = self
            .hex_value
            .replace_all(&text, "[A hexadecimal value is shown]");

        let text = self.ip_address.replace_all(&text, |caps: &Captures| {
            spell_out_ip(caps.get(0).map(|m| m.as_str()).unwrap_or_default())
        });

        let text = self.long_number.replace_all(&text, |caps: &Captures| {
            let digits = caps.get(0).map(|m| m.as_str().len()).unwrap_or(0);
            format!("[A {}-digit number]", digits)
        });

        collapse_duplicate_placeholders(&text)
    }
}

/// Converts an IP address to spelled-out words
fn spell_out_ip(ip: &str) -> String {
    let spelled: Vec<String> = ip
        .split('.')
        .map(|part| {
            part.chars()
                .map(|digit| match digit {
                    '0' => "Zero",
                    '1' => "One",
                    '2' => "Two",
                    '3' => "Three",
                    '4' => "Four",
                    '5' => "Five",
                    '6' => "Six",
                    '7' => "Seven",
                    '8' => "Eight",
                    _ => "Nine",
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    format!("[{}]", spelled.join(" Dot "))
}

/// Collapses immediately repeated identical `[...]` placeholders into one
fn collapse_duplicate_placeholders(text: &str) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER.get_or_init(|| Regex::new(r"\[[^\[\]]+\]").unwrap());

    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;
    let mut previous: Option<&str> = None;

    for m in re.find_iter(text) {
        let gap = &text[last_end..m.start()];
        if !gap.is_empty() {
            previous = None;
        }
        result.push_str(gap);

        if previous != Some(m.as_str()) {
            result.push_str(m.as_str());
        }
        previous = Some(m.as_str());
        last_end = m.end();
    }
    result.push_str(&text[last_end..]);
    result
}

/// Normalizes text for speech synthesis.
///
/// Pure and idempotent on its own output. Must be applied exactly once,
/// upstream of segmentation; every later stage works on the returned string.
pub fn normalize_text(text: &str) -> String {
    static NORMALIZER: OnceLock<Normalizer> = OnceLock::new();
    NORMALIZER.get_or_init(Normalizer::new).apply(text)
}

/// Counts whitespace-delimited words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_replaced() {
        let out = normalize_text("See https://example.com/page for details");
        assert_eq!(out, "See [A URL is shown] for details");

        let out = normalize_text("Visit www.example.com today");
        assert_eq!(out, "Visit [A URL is shown] today");
    }

    #[test]
    fn test_code_block_replaced() {
        let out = normalize_text("Before ```let x = 1;``` after");
        assert_eq!(out, "Before [Code block is shown] after");
    }

    #[test]
    fn test_email_replaced() {
        let out = normalize_text("Mail me at someone@example.org please");
        assert_eq!(out, "Mail me at [An email address is shown] please");
    }

    #[test]
    fn test_ip_spelled_out() {
        let out = normalize_text("Server at 10.0.0.1 responded");
        assert_eq!(
            out,
            "Server at [One Zero Dot Zero Dot Zero Dot One] responded"
        );
    }

    #[test]
    fn test_long_number_described() {
        let out = normalize_text("Order 1234567 shipped");
        assert_eq!(out, "Order [A 7-digit number] shipped");
    }

    #[test]
    fn test_hex_value_replaced() {
        let out = normalize_text("Address 0xDEADBEEF was read");
        assert_eq!(out, "Address [A hexadecimal value is shown] was read");
    }

    #[test]
    fn test_duplicate_placeholders_collapsed() {
        let out = normalize_text("links: https://a.example https://b.example done");
        // Both URLs collapse into a single placeholder once adjacent
        assert!(!out.contains("[A URL is shown] [A URL is shown] [A URL is shown]"));
        assert!(out.contains("[A URL is shown]"));

        let collapsed = collapse_duplicate_placeholders("[X is shown][X is shown][X is shown]");
        assert_eq!(collapsed, "[X is shown]");
    }

    #[test]
    fn test_plain_prose_untouched() {
        let text = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(normalize_text(text), text);
    }

    #[test]
    fn test_idempotent_on_normalized_output() {
        // Applying normalization a second time must not move any word:
        // caption timing is derived from this exact string.
        let samples = [
            "Check https://example.com and mail someone@example.org now.",
            "Host 192.168.1.1 logged ticket 99887766 at 0xFF00.",
            "Plain sentence with nothing special at all.",
        ];
        for sample in samples {
            let once = normalize_text(sample);
            let twice = normalize_text(&once);
            assert_eq!(once, twice, "normalization drifted on: {sample}");
        }
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three\nfour"), 4);
        assert_eq!(word_count("   "), 0);
    }
}
