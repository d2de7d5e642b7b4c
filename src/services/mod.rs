// PlagAI Scanner Core Services

pub mod analysis;
pub mod config_store;
pub mod error;
pub mod file_parser;
pub mod lexicon;
pub mod prompt_builder;
pub mod providers;
pub mod report;
pub mod response_parser;
pub mod text_processor;

pub use analysis::{classify_provider_error, run_analysis, validate_api_key};
pub use config_store::*;
pub use error::ScanError;
pub use file_parser::{extract_text, file_extension};
pub use lexicon::LocaleLexicon;
pub use prompt_builder::{build_prompt_bundle, PromptBundle};
pub use providers::*;
pub use report::render_report;
pub use response_parser::{ParsedResponse, ResponseDecoder, ResponseParser};
pub use text_processor::*;
