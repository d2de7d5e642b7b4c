// AI Provider Service
// Gemini generateContent client with optional Google Search grounding

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Citation;

const GEMINI_DEFAULT_URL: &str = "https://generativelanguage.googleapis.com";
const GEMINI_API_VERSION: &str = "v1beta";
// Search-grounded reasoning calls can run for minutes
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Fragments the service uses when rejecting a key
const INVALID_KEY_MARKERS: [&str; 4] = [
    "API key not valid",
    "API key is invalid",
    "API key expired",
    "API_KEY_INVALID",
];

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Missing content in response")]
    MissingContent,
    #[error("JSON parse error: {0}")]
    JsonError(String),
    #[error("API key not configured")]
    MissingApiKey,
}

impl ProviderError {
    /// True when the failure says the credential is invalid or expired
    pub fn indicates_invalid_key(&self) -> bool {
        match self {
            ProviderError::ApiError { message, .. } => {
                INVALID_KEY_MARKERS.iter().any(|m| message.contains(m))
            }
            ProviderError::MissingApiKey => true,
            _ => false,
        }
    }
}

// ============ Wire Types ============

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<SamplingParams>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Clone, Serialize, Default)]
struct GoogleSearch {}

/// Sampling parameters forwarded as `generationConfig`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

// ============ Client ============

/// One generateContent call
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub contents: String,
    pub system_instruction: Option<String>,
    pub sampling: Option<SamplingParams>,
    /// Enable the Google Search grounding tool
    pub web_search: bool,
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub text: String,
    pub citations: Vec<Citation>,
    pub latency_ms: i64,
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn with_base_url(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_proxy(base_url: &str, proxy_url: &str) -> Result<Self, ProviderError> {
        let proxy = reqwest::Proxy::all(proxy_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .proxy(proxy)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, GEMINI_API_VERSION, model
        )
    }

    /// Single non-streamed generateContent call. No retries.
    pub async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }

        let body = build_wire_request(request);
        let start = Instant::now();

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as i64;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::JsonError(e.to_string()))?;

        let result = into_generation_result(data, latency_ms)?;
        info!(
            "[GEMINI] model={} latency_ms={} chars={} citations={}",
            model,
            latency_ms,
            result.text.chars().count(),
            result.citations.len()
        );
        Ok(result)
    }
}

fn build_wire_request(request: &GenerationRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: request.contents.clone(),
            }],
        }],
        system_instruction: request.system_instruction.as_ref().map(|s| Content {
            role: None,
            parts: vec![Part { text: s.clone() }],
        }),
        generation_config: request.sampling,
        tools: if request.web_search {
            vec![Tool {
                google_search: GoogleSearch::default(),
            }]
        } else {
            Vec::new()
        },
    }
}

/// Text of the first candidate (thought parts skipped) plus its web citations
fn into_generation_result(
    data: GenerateContentResponse,
    latency_ms: i64,
) -> Result<GenerationResult, ProviderError> {
    let candidate = data
        .candidates
        .into_iter()
        .next()
        .ok_or(ProviderError::MissingContent)?;

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    if texts.is_empty() {
        return Err(ProviderError::MissingContent);
    }

    let citations = candidate
        .grounding_metadata
        .map(|g| g.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .filter_map(|web| {
            web.uri.map(|uri| Citation {
                uri,
                title: web.title,
            })
        })
        .collect();

    Ok(GenerationResult {
        text: texts.concat(),
        citations,
        latency_ms,
    })
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => {
            debug!("[GEMINI] api error status={:?}", envelope.error.status);
            if envelope.error.message.is_empty() {
                body.to_string()
            } else {
                envelope.error.message
            }
        }
        Err(_) => body.to_string(),
    }
}

/// Endpoint base: GEMINI_API_URL, then the config file, then the public API
pub fn resolve_base_url() -> String {
    if let Ok(url) = env::var("GEMINI_API_URL") {
        if !url.trim().is_empty() {
            return url.trim().to_string();
        }
    }

    if let Some(config_dir) = super::ConfigStore::default_config_dir() {
        let store = super::ConfigStore::new(config_dir);
        if let Ok(config) = store.load() {
            if let Some(url) = config.gemini_base_url.filter(|u| !u.trim().is_empty()) {
                return url;
            }
        }
    }

    GEMINI_DEFAULT_URL.to_string()
}

/// Get API key from environment or config file
pub fn get_api_key() -> Option<String> {
    for key in ["GEMINI_API_KEY", "PLAGAI_GEMINI_API_KEY", "API_KEY"] {
        if let Ok(val) = env::var(key) {
            let v = val.trim();
            if !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }

    if let Some(config_dir) = super::ConfigStore::default_config_dir() {
        let store = super::ConfigStore::new(config_dir);
        if let Ok(Some(key)) = store.get_api_key() {
            return Some(key);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_request_shape() {
        let request = GenerationRequest {
            contents: "prompt\ntext".to_string(),
            system_instruction: Some("# PERSONA\nx".to_string()),
            sampling: Some(SamplingParams {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.95,
            }),
            web_search: true,
        };
        let value = serde_json::to_value(build_wire_request(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "prompt\ntext"}]}],
                "systemInstruction": {"parts": [{"text": "# PERSONA\nx"}]},
                "generationConfig": {"temperature": 0.7, "topK": 40, "topP": 0.95},
                "tools": [{"googleSearch": {}}]
            })
        );
    }

    #[test]
    fn test_minimal_wire_request_omits_optional_fields() {
        let request = GenerationRequest {
            contents: "test".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(build_wire_request(&request)).unwrap();
        assert_eq!(
            value,
            json!({"contents": [{"role": "user", "parts": [{"text": "test"}]}]})
        );
    }

    #[test]
    fn test_response_text_and_citations() {
        let data: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "Hello "},
                    {"text": "world"}
                ]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://a.example", "title": "A"}},
                    {"retrievedContext": {"uri": "ignored"}},
                    {"web": {"uri": "https://b.example"}}
                ]}
            }]
        }))
        .unwrap();

        let result = into_generation_result(data, 12).unwrap();
        assert_eq!(result.text, "Hello world");
        assert_eq!(
            result.citations,
            vec![
                Citation { uri: "https://a.example".to_string(), title: Some("A".to_string()) },
                Citation { uri: "https://b.example".to_string(), title: None },
            ]
        );
    }

    #[test]
    fn test_response_without_text_is_missing_content() {
        let data: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert!(matches!(
            into_generation_result(data, 0),
            Err(ProviderError::MissingContent)
        ));

        let data: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            into_generation_result(data, 0),
            Err(ProviderError::MissingContent)
        ));
    }

    #[test]
    fn test_invalid_key_detection() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = ProviderError::ApiError {
            status: 400,
            message: api_error_message(body),
        };
        assert!(err.indicates_invalid_key());

        let err = ProviderError::ApiError {
            status: 503,
            message: api_error_message("upstream unavailable"),
        };
        assert!(!err.indicates_invalid_key());
        assert!(!ProviderError::MissingContent.indicates_invalid_key());
    }

    #[test]
    fn test_endpoint_format() {
        let client = GeminiClient::with_base_url("http://localhost:9999/");
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
