// Response Parser
// Decodes the marker-delimited model response into plagiarism and AI-generation results.
//
// Format (markers are the same for every locale, labels come from the lexicon):
//   [PLAGIARISM_ANALYSIS_START] <score>: N / <assessment>: text / --- / analysis [PLAGIARISM_ANALYSIS_END]
//   [PLAGIARIZED_SEGMENTS_START] <segments>: a|||b|||c [PLAGIARIZED_SEGMENTS_END]
//   [AI_ANALYSIS_START] <ai score>: N / <ai assessment>: text / --- / analysis [AI_ANALYSIS_END]
//   [HUMANIZING_SUGGESTIONS_START] <suggestions>: a|||b [HUMANIZING_SUGGESTIONS_END]
//
// Parsing never fails: missing blocks or lines degrade to score 0, the
// assessment sentinel, or an empty list.

use regex::Regex;

use crate::models::{AiGenerationResult, PlagiarismResult, ASSESSMENT_UNAVAILABLE};

use super::lexicon::FieldLabels;

pub const PLAGIARISM_START: &str = "[PLAGIARISM_ANALYSIS_START]";
pub const PLAGIARISM_END: &str = "[PLAGIARISM_ANALYSIS_END]";
pub const SEGMENTS_START: &str = "[PLAGIARIZED_SEGMENTS_START]";
pub const SEGMENTS_END: &str = "[PLAGIARIZED_SEGMENTS_END]";
pub const AI_START: &str = "[AI_ANALYSIS_START]";
pub const AI_END: &str = "[AI_ANALYSIS_END]";
pub const SUGGESTIONS_START: &str = "[HUMANIZING_SUGGESTIONS_START]";
pub const SUGGESTIONS_END: &str = "[HUMANIZING_SUGGESTIONS_END]";

/// Separates list items inside a single value
pub const LIST_DELIMITER: &str = "|||";
/// Separates the key/value header from the free-text analysis
pub const ANALYSIS_SEPARATOR: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub plagiarism: PlagiarismResult,
    pub ai_generation: AiGenerationResult,
}

/// Turns raw response text into structured results. Callers depend on this
/// rather than on the marker syntax.
pub trait ResponseDecoder {
    fn decode(&self, raw: &str) -> ParsedResponse;
}

/// Patterns compiled from one locale's field labels
pub struct ResponseParser {
    labels: FieldLabels,
    score_re: Regex,
    assessment_re: Regex,
    segments_re: Regex,
    ai_score_re: Regex,
    ai_assessment_re: Regex,
    suggestions_re: Regex,
}

impl ResponseParser {
    pub fn new(labels: &FieldLabels) -> Self {
        Self {
            labels: labels.clone(),
            score_re: score_pattern(labels.score),
            assessment_re: line_pattern(labels.assessment),
            segments_re: line_pattern(labels.plagiarized_segments),
            ai_score_re: score_pattern(labels.ai_score),
            ai_assessment_re: line_pattern(labels.ai_assessment),
            suggestions_re: line_pattern(labels.humanizing_suggestions),
        }
    }

    /// Label tokens the extraction patterns were built from
    pub fn anchors(&self) -> Vec<&'static str> {
        self.labels.all().to_vec()
    }

    pub fn parse(&self, raw: &str) -> ParsedResponse {
        let plagiarism_block = isolate_block(raw, PLAGIARISM_START, PLAGIARISM_END);
        let segments_block = isolate_block(raw, SEGMENTS_START, SEGMENTS_END);
        let ai_block = isolate_block(raw, AI_START, AI_END);
        let suggestions_block = isolate_block(raw, SUGGESTIONS_START, SUGGESTIONS_END);

        let plagiarism = PlagiarismResult {
            score: extract_score(&self.score_re, plagiarism_block),
            assessment: extract_assessment(&self.assessment_re, plagiarism_block),
            analysis: extract_analysis(plagiarism_block),
            plagiarized_segments: extract_list(&self.segments_re, segments_block),
        };

        let suggestions = extract_list(&self.suggestions_re, suggestions_block);
        let ai_generation = AiGenerationResult {
            score: extract_score(&self.ai_score_re, ai_block),
            assessment: extract_assessment(&self.ai_assessment_re, ai_block),
            analysis: extract_analysis(ai_block),
            suggestions: if suggestions.is_empty() {
                None
            } else {
                Some(suggestions)
            },
        };

        ParsedResponse {
            plagiarism,
            ai_generation,
        }
    }
}

impl ResponseDecoder for ResponseParser {
    fn decode(&self, raw: &str) -> ParsedResponse {
        self.parse(raw)
    }
}

fn score_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"{}: ([^\r\n]*)", regex::escape(label)))
        .expect("escaped label forms a valid pattern")
}

fn line_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"{}: (.*)", regex::escape(label)))
        .expect("escaped label forms a valid pattern")
}

/// Text before the first end marker, then the piece right after the start marker.
/// Either marker missing yields an empty block.
fn isolate_block<'a>(raw: &'a str, start: &str, end: &str) -> &'a str {
    let Some(end_idx) = raw.find(end) else {
        return "";
    };
    raw[..end_idx].split(start).nth(1).unwrap_or("")
}

/// Value of the first score line; anything but plain ASCII digits (after trailing
/// whitespace) yields 0.
fn extract_score(re: &Regex, block: &str) -> u32 {
    re.captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end())
        .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0)
}

fn extract_assessment(re: &Regex, block: &str) -> String {
    re.captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| ASSESSMENT_UNAVAILABLE.to_string())
}

fn extract_analysis(block: &str) -> String {
    match block.split(ANALYSIS_SEPARATOR).nth(1) {
        Some(part) => part.trim().to_string(),
        None => block.to_string(),
    }
}

fn extract_list(re: &Regex, block: &str) -> Vec<String> {
    re.captures(block)
        .and_then(|c| c.get(1))
        .map(|m| split_list(m.as_str()))
        .unwrap_or_default()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_DELIMITER)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
