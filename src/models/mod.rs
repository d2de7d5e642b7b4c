// PlagAI Scanner Data Models
// Request, configuration and result types shared by services, api and CLI

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Placeholder assessment used when the model response has no assessment line.
/// Substituted with a localized message at render time.
pub const ASSESSMENT_UNAVAILABLE: &str = "error.assessmentFailed";

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_K: u32 = 40;
pub const DEFAULT_TOP_P: f64 = 0.95;

// ============ Locale & Model Selection ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Pt, Language::En, Language::Es];

    pub fn code(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt" | "pt-br" => Ok(Language::Pt),
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(format!("unsupported language: {} (expected pt, en or es)", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Remote model used for the analysis call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Low-latency model
    #[default]
    Flash,
    /// Deep-reasoning model, slower
    Pro,
}

impl ModelVariant {
    pub fn model_id(self) -> &'static str {
        match self {
            ModelVariant::Flash => "gemini-2.5-flash",
            ModelVariant::Pro => "gemini-2.5-pro",
        }
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flash" | "gemini-2.5-flash" => Ok(ModelVariant::Flash),
            "pro" | "gemini-2.5-pro" => Ok(ModelVariant::Pro),
            other => Err(format!("unsupported model: {} (expected flash or pro)", other)),
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_id())
    }
}

// ============ Model Configuration ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub persona: String,
    pub context: String,
    pub memory: String,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
}

impl ModelConfig {
    /// Clamp sampling parameters into the ranges the service accepts.
    /// Non-finite values fall back to the defaults.
    pub fn sanitized(&self) -> ModelConfig {
        let mut out = self.clone();

        let temperature = if self.temperature.is_finite() {
            self.temperature.clamp(0.0, 2.0)
        } else {
            DEFAULT_TEMPERATURE
        };
        if temperature != self.temperature {
            warn!(
                "[CONFIG] temperature {} out of range, using {}",
                self.temperature, temperature
            );
        }
        out.temperature = temperature;

        let top_p = if self.top_p.is_finite() {
            self.top_p.clamp(0.0, 1.0)
        } else {
            DEFAULT_TOP_P
        };
        if top_p != self.top_p {
            warn!("[CONFIG] topP {} out of range, using {}", self.top_p, top_p);
        }
        out.top_p = top_p;

        if self.top_k == 0 {
            warn!("[CONFIG] topK 0 out of range, using 1");
            out.top_k = 1;
        }

        out
    }
}

/// Partial overrides of the per-locale defaults, as stored in the config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl ModelConfigOverrides {
    pub fn apply(&self, base: ModelConfig) -> ModelConfig {
        ModelConfig {
            persona: self.persona.clone().unwrap_or(base.persona),
            context: self.context.clone().unwrap_or(base.context),
            memory: self.memory.clone().unwrap_or(base.memory),
            temperature: self.temperature.unwrap_or(base.temperature),
            top_k: self.top_k.unwrap_or(base.top_k),
            top_p: self.top_p.unwrap_or(base.top_p),
        }
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merged_with(&self, other: &ModelConfigOverrides) -> ModelConfigOverrides {
        ModelConfigOverrides {
            persona: other.persona.clone().or_else(|| self.persona.clone()),
            context: other.context.clone().or_else(|| self.context.clone()),
            memory: other.memory.clone().or_else(|| self.memory.clone()),
            temperature: other.temperature.or(self.temperature),
            top_k: other.top_k.or(self.top_k),
            top_p: other.top_p.or(self.top_p),
        }
    }
}

// ============ Analysis Request ============

/// Where the submitted text came from. Manual entry is subject to the word limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum InputSource {
    Manual,
    File { name: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub submitted_text: String,
    pub language: Language,
    pub model_variant: ModelVariant,
    pub model_config: ModelConfig,
    pub source: InputSource,
}

// ============ Analysis Results ============

/// Web source returned in the grounding metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismResult {
    pub score: u32,
    pub assessment: String,
    pub analysis: String,
    /// Expected to be verbatim substrings of the submitted text; not verified locally.
    #[serde(default)]
    pub plagiarized_segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiGenerationResult {
    pub score: u32,
    pub assessment: String,
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub request_id: String,
    pub model: String,
    pub language: Language,
    pub latency_ms: i64,
    pub plagiarism: PlagiarismResult,
    pub ai_generation: AiGenerationResult,
    #[serde(default)]
    pub sources: Vec<Citation>,
}
