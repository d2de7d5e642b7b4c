// Scan Errors
// Failure taxonomy surfaced to the user; every variant maps to a stable message key

use thiserror::Error;

use super::lexicon::LocaleLexicon;
use super::text_processor::MAX_MANUAL_WORDS;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Unsupported file type: .{extension}")]
    UnsupportedFileType { extension: String },
    #[error("Legacy .doc files are not supported")]
    UnsupportedLegacyFormat,
    #[error("Failed to process file: {0}")]
    FileProcessingFailure(String),
    #[error("No text to analyze")]
    EmptyInputRejected,
    #[error("Manually entered text has {words} words (max: {max_words})")]
    InputTooLong { words: usize, max_words: usize },
    #[error("API key is invalid or expired")]
    InvalidCredential,
    #[error("Analysis service call failed: {0}")]
    ServiceCallFailure(String),
    #[error("Unknown failure: {0}")]
    UnknownFailure(String),
}

impl ScanError {
    pub fn message_key(&self) -> &'static str {
        match self {
            ScanError::UnsupportedFileType { .. } => "error.unsupportedFileType",
            ScanError::UnsupportedLegacyFormat => "error.unsupportedDoc",
            ScanError::FileProcessingFailure(_) => "error.processingFile",
            ScanError::EmptyInputRejected => "error.textRequired",
            ScanError::InputTooLong { .. } => "error.wordLimitExceeded",
            ScanError::InvalidCredential => "error.invalidApiKey",
            ScanError::ServiceCallFailure(_) => "error.apiFail",
            ScanError::UnknownFailure(_) => "error.unknown",
        }
    }

    /// User-facing message in the lexicon's language
    pub fn localized(&self, lexicon: &LocaleLexicon) -> String {
        let msg = &lexicon.errors;
        match self {
            ScanError::UnsupportedFileType { extension } => {
                msg.unsupported_file_type.replace("{ext}", extension)
            }
            ScanError::UnsupportedLegacyFormat => msg.unsupported_doc.to_string(),
            ScanError::FileProcessingFailure(_) => msg.processing_file.to_string(),
            ScanError::EmptyInputRejected => msg.text_required.to_string(),
            ScanError::InputTooLong { max_words, .. } => msg
                .word_limit_exceeded
                .replace("{maxWords}", &max_words.to_string()),
            ScanError::InvalidCredential => msg.invalid_api_key.to_string(),
            ScanError::ServiceCallFailure(_) => msg.api_fail.to_string(),
            ScanError::UnknownFailure(_) => msg.unknown.to_string(),
        }
    }

    pub fn input_too_long(words: usize) -> Self {
        ScanError::InputTooLong {
            words,
            max_words: MAX_MANUAL_WORDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;

    #[test]
    fn test_message_keys_are_distinct_for_doc_and_unknown_extension() {
        let legacy = ScanError::UnsupportedLegacyFormat;
        let other = ScanError::UnsupportedFileType {
            extension: "rtf".to_string(),
        };
        assert_ne!(legacy.message_key(), other.message_key());
    }

    #[test]
    fn test_localized_messages_fill_placeholders() {
        let en = LocaleLexicon::get(Language::En);
        let err = ScanError::UnsupportedFileType {
            extension: "rtf".to_string(),
        };
        assert_eq!(err.localized(en), "Unsupported file type: .rtf");

        let err = ScanError::input_too_long(1600);
        assert_eq!(
            err.localized(en),
            "Manually entered text exceeds the 1500 word limit."
        );
    }

    #[test]
    fn test_localized_invalid_key_per_locale() {
        let pt = LocaleLexicon::get(Language::Pt);
        assert!(ScanError::InvalidCredential.localized(pt).starts_with("A chave de API"));
    }
}
