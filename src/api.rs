// Command API
// Entry points used by the presentation layer; failures come back as localized messages

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::{
    AnalysisOutcome, AnalysisRequest, InputSource, Language, ModelConfigOverrides, ModelVariant,
};
use crate::services::{
    self, AppConfig, ConfigStore, GeminiClient, LocaleLexicon, ScanError,
};

fn config_store() -> Result<ConfigStore, String> {
    ConfigStore::default_config_dir()
        .map(ConfigStore::new)
        .ok_or_else(|| "Could not determine config directory".to_string())
}

fn load_config() -> AppConfig {
    match config_store().and_then(|s| s.load()) {
        Ok(config) => config,
        Err(e) => {
            warn!("[API] using default config: {}", e);
            AppConfig::default()
        }
    }
}

fn localized(err: ScanError, language: Language) -> String {
    err.localized(LocaleLexicon::get(language))
}

/// Gemini client honoring the configured endpoint and proxy
pub fn build_client(config: &AppConfig) -> Result<GeminiClient, String> {
    let base_url = services::resolve_base_url();
    match config.proxy.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(proxy) => GeminiClient::with_proxy(&base_url, proxy)
            .map_err(|e| format!("Invalid proxy {}: {}", proxy, e)),
        None => Ok(GeminiClient::with_base_url(&base_url)),
    }
}

/// Extract plain text from an uploaded document
pub async fn preprocess_file(
    file_name: String,
    file_bytes: Vec<u8>,
    language: Language,
) -> Result<String, String> {
    info!(
        "[API] preprocess_file name_len={} bytes={}",
        file_name.len(),
        file_bytes.len()
    );

    let result = tokio::task::spawn_blocking(move || services::extract_text(&file_name, &file_bytes))
        .await
        .map_err(|e| ScanError::UnknownFailure(e.to_string()))
        .and_then(|r| r);

    result.map_err(|e| localized(e, language))
}

/// Options for one analysis; unset fields fall back to the config file, then locale defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOptions {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub model: Option<ModelVariant>,
    #[serde(default)]
    pub model_config: ModelConfigOverrides,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Build the request the analysis would run with, without calling the service
pub fn prepare_request(
    text: String,
    source: InputSource,
    options: &AnalyzeOptions,
    config: &AppConfig,
) -> AnalysisRequest {
    let language = options.language.unwrap_or(config.language);
    let base = LocaleLexicon::get(language).default_model_config();
    let overrides = config
        .model_config
        .clone()
        .unwrap_or_default()
        .merged_with(&options.model_config);

    AnalysisRequest {
        submitted_text: text,
        language,
        model_variant: options.model.unwrap_or(config.model),
        model_config: overrides.apply(base),
        source,
    }
}

/// Analyze text for plagiarism and AI generation
pub async fn analyze_text(
    text: String,
    source: InputSource,
    options: AnalyzeOptions,
) -> Result<AnalysisOutcome, String> {
    let config = load_config();
    let request = prepare_request(text, source, &options, &config);
    let language = request.language;

    let credential = options
        .api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .or_else(services::get_api_key)
        .ok_or_else(|| localized(ScanError::InvalidCredential, language))?;

    let client = build_client(&config)?;
    services::run_analysis(&client, &request, &credential)
        .await
        .map_err(|e| localized(e, language))
}

/// Check whether an API key is accepted by the service
pub async fn validate_key(api_key: String) -> Result<bool, String> {
    let config = load_config();
    let client = build_client(&config)?;
    Ok(services::validate_api_key(&client, &api_key).await)
}

pub fn get_config() -> Result<AppConfig, String> {
    config_store()?.load()
}

pub fn store_api_key(api_key: String) -> Result<(), String> {
    if api_key.trim().is_empty() {
        return Err("API key must not be empty".to_string());
    }
    config_store()?.set_api_key(&api_key)
}

pub fn delete_api_key() -> Result<(), String> {
    config_store()?.delete_api_key()
}

/// Whether a credential is available from the environment or config file
pub fn has_api_key() -> bool {
    services::get_api_key().is_some()
}

pub fn set_language(language: Language) -> Result<(), String> {
    config_store()?.set_language(language)
}

pub fn set_model(model: ModelVariant) -> Result<(), String> {
    config_store()?.set_model(model)
}

pub fn set_base_url(url: String) -> Result<(), String> {
    config_store()?.set_base_url(&url)
}
