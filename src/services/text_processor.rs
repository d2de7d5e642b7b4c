// Text Processing Service
// Input checks, word counting and segment highlighting for submitted text

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::models::InputSource;

use super::error::ScanError;

/// Word limit for manually entered text; file-sourced text is exempt
pub const MAX_MANUAL_WORDS: usize = 1500;

/// Whitespace-separated word count
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Reject empty input and over-long manual input before any network call
pub fn check_submission(text: &str, source: &InputSource) -> Result<(), ScanError> {
    if text.trim().is_empty() {
        return Err(ScanError::EmptyInputRejected);
    }

    if matches!(source, InputSource::Manual) {
        let words = count_words(text);
        if words > MAX_MANUAL_WORDS {
            return Err(ScanError::input_too_long(words));
        }
    }

    Ok(())
}

/// Single-line preview of at most `max_chars` characters
pub fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSpan {
    pub text: String,
    pub matched: bool,
}

/// Split `text` into plain and matched spans for the given segments.
/// Matching is case-insensitive and prefers longer segments.
pub fn highlight_segments(text: &str, segments: &[String]) -> Vec<HighlightSpan> {
    let mut sorted: Vec<&str> = segments
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
        .collect();

    if sorted.is_empty() || text.is_empty() {
        return vec![HighlightSpan {
            text: text.to_string(),
            matched: false,
        }];
    }

    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    let pattern = sorted
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|");

    let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(_) => {
            return vec![HighlightSpan {
                text: text.to_string(),
                matched: false,
            }]
        }
    };

    let mut spans = Vec::new();
    let mut cursor = 0;
    for m in re.find_iter(text) {
        if m.start() > cursor {
            spans.push(HighlightSpan {
                text: text[cursor..m.start()].to_string(),
                matched: false,
            });
        }
        spans.push(HighlightSpan {
            text: m.as_str().to_string(),
            matched: true,
        });
        cursor = m.end();
    }
    if cursor < text.len() {
        spans.push(HighlightSpan {
            text: text[cursor..].to_string(),
            matched: false,
        });
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  The quick\n\tbrown   fox "), 4);
    }

    #[test]
    fn test_check_submission_rejects_blank_text() {
        assert_eq!(
            check_submission("   \n", &InputSource::Manual),
            Err(ScanError::EmptyInputRejected)
        );
        let file = InputSource::File {
            name: "a.pdf".to_string(),
        };
        assert_eq!(check_submission("", &file), Err(ScanError::EmptyInputRejected));
    }

    #[test]
    fn test_word_limit_applies_only_to_manual_input() {
        let text = "word ".repeat(MAX_MANUAL_WORDS + 1);
        assert_eq!(
            check_submission(&text, &InputSource::Manual),
            Err(ScanError::InputTooLong {
                words: MAX_MANUAL_WORDS + 1,
                max_words: MAX_MANUAL_WORDS
            })
        );

        let file = InputSource::File {
            name: "thesis.docx".to_string(),
        };
        assert!(check_submission(&text, &file).is_ok());

        let at_limit = "word ".repeat(MAX_MANUAL_WORDS);
        assert!(check_submission(&at_limit, &InputSource::Manual).is_ok());
    }

    #[test]
    fn test_highlight_segments_case_insensitive() {
        let spans = highlight_segments(
            "The Quick brown fox jumps.",
            &["quick brown".to_string()],
        );
        assert_eq!(
            spans,
            vec![
                HighlightSpan { text: "The ".to_string(), matched: false },
                HighlightSpan { text: "Quick brown".to_string(), matched: true },
                HighlightSpan { text: " fox jumps.".to_string(), matched: false },
            ]
        );
    }

    #[test]
    fn test_highlight_prefers_longer_segment() {
        let spans = highlight_segments(
            "a b c",
            &["a".to_string(), "a b".to_string()],
        );
        assert_eq!(spans[0], HighlightSpan { text: "a b".to_string(), matched: true });
    }

    #[test]
    fn test_highlight_without_segments_is_single_plain_span() {
        let spans = highlight_segments("Nothing copied (really).", &[]);
        assert_eq!(spans.len(), 1);
        assert!(!spans[0].matched);
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("abc\ndef", 3), "abc...");
        assert_eq!(preview("ab\nc", 10), "ab c");
    }
}
