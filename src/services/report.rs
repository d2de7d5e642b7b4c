// Report Rendering
// Plain-text report for an analysis outcome in the selected language

use std::fmt::Write;

use crate::models::{AnalysisOutcome, ASSESSMENT_UNAVAILABLE};

use super::lexicon::LocaleLexicon;
use super::text_processor::highlight_segments;

const HIGHLIGHT_OPEN: &str = "[[";
const HIGHLIGHT_CLOSE: &str = "]]";

/// Replace the parser's sentinel with the localized message; other text passes through
pub fn display_assessment<'a>(assessment: &'a str, lexicon: &'a LocaleLexicon) -> &'a str {
    if assessment == ASSESSMENT_UNAVAILABLE {
        lexicon.errors.assessment_failed
    } else {
        assessment
    }
}

/// Submitted text with every matched segment wrapped in `[[...]]`
pub fn mark_segments(submitted_text: &str, segments: &[String]) -> String {
    highlight_segments(submitted_text, segments)
        .into_iter()
        .map(|span| {
            if span.matched {
                format!("{}{}{}", HIGHLIGHT_OPEN, span.text, HIGHLIGHT_CLOSE)
            } else {
                span.text
            }
        })
        .collect()
}

pub fn render_report(
    outcome: &AnalysisOutcome,
    lexicon: &LocaleLexicon,
    submitted_text: &str,
) -> String {
    let r = &lexicon.report;
    let plagiarism = &outcome.plagiarism;
    let ai = &outcome.ai_generation;
    let mut out = String::new();

    // fmt::Write into a String cannot fail
    let _ = writeln!(out, "{}", r.report_title);
    let _ = writeln!(out, "{}", "=".repeat(r.report_title.chars().count()));
    let _ = writeln!(out);

    section(&mut out, r.plagiarism_title);
    let _ = writeln!(out, "{}", r.plagiarism_score_description);
    let _ = writeln!(out, "{}: {}%", r.score, plagiarism.score);
    let _ = writeln!(
        out,
        "{}: {}",
        r.assessment,
        display_assessment(&plagiarism.assessment, lexicon)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}:", r.analysis);
    let _ = writeln!(out, "{}", plagiarism.analysis.trim());
    let _ = writeln!(out);

    if !plagiarism.plagiarized_segments.is_empty() {
        let _ = writeln!(out, "{}:", r.highlighted_segments);
        for segment in &plagiarism.plagiarized_segments {
            let _ = writeln!(out, "  - \"{}\"", segment);
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            mark_segments(submitted_text, &plagiarism.plagiarized_segments).trim()
        );
        let _ = writeln!(out);
    }

    if !outcome.sources.is_empty() {
        let _ = writeln!(out, "{}:", r.sources);
        for (i, source) in outcome.sources.iter().enumerate() {
            match &source.title {
                Some(title) => {
                    let _ = writeln!(out, "  {}. {} <{}>", i + 1, title, source.uri);
                }
                None => {
                    let _ = writeln!(out, "  {}. {}", i + 1, source.uri);
                }
            }
        }
        let _ = writeln!(out);
    }

    section(&mut out, r.ai_title);
    let _ = writeln!(out, "{}", r.ai_score_description);
    let _ = writeln!(out, "{}: {}%", r.ai_score, ai.score);
    let _ = writeln!(
        out,
        "{}: {}",
        r.ai_assessment,
        display_assessment(&ai.assessment, lexicon)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}:", r.ai_analysis);
    let _ = writeln!(out, "{}", ai.analysis.trim());

    if let Some(suggestions) = &ai.suggestions {
        let _ = writeln!(out);
        section(&mut out, r.suggestions_title);
        let _ = writeln!(out, "{}", r.suggestions_description);
        for suggestion in suggestions {
            let _ = writeln!(out, "  - {}", suggestion);
        }
    }

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}
