// Analysis Client
// One grounded Gemini call per submission, decoded into plagiarism and AI-generation results

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AnalysisOutcome, AnalysisRequest, ModelVariant};

use super::error::ScanError;
use super::lexicon::LocaleLexicon;
use super::prompt_builder::build_prompt_bundle;
use super::providers::{GeminiClient, GenerationRequest, ProviderError, SamplingParams};
use super::response_parser::{ResponseDecoder, ResponseParser};
use super::text_processor::check_submission;

const VALIDATION_PROMPT: &str = "test";

/// Map a transport failure onto the user-facing taxonomy
pub fn classify_provider_error(err: &ProviderError) -> ScanError {
    if err.indicates_invalid_key() {
        ScanError::InvalidCredential
    } else {
        ScanError::ServiceCallFailure(err.to_string())
    }
}

/// Run a full analysis: input checks, prompt assembly, one service call, decoding.
pub async fn run_analysis(
    client: &GeminiClient,
    request: &AnalysisRequest,
    credential: &str,
) -> Result<AnalysisOutcome, ScanError> {
    check_submission(&request.submitted_text, &request.source)?;

    let request_id = Uuid::new_v4().to_string();
    let lexicon = LocaleLexicon::get(request.language);
    let config = request.model_config.sanitized();
    let model = request.model_variant.model_id();

    info!(
        "[ANALYSIS] request_id={} model={} language={} chars={}",
        request_id,
        model,
        request.language,
        request.submitted_text.chars().count()
    );

    let bundle = build_prompt_bundle(lexicon, &config, &request.submitted_text);
    let generation = GenerationRequest {
        contents: bundle.contents,
        system_instruction: Some(bundle.system_instruction),
        sampling: Some(SamplingParams {
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
        }),
        web_search: true,
    };

    let result = client
        .generate_content(credential, model, &generation)
        .await
        .map_err(|e| {
            let classified = classify_provider_error(&e);
            warn!(
                "[ANALYSIS] request_id={} failed ({}): {}",
                request_id,
                classified.message_key(),
                e
            );
            classified
        })?;

    let parser = ResponseParser::new(&lexicon.labels);
    let parsed = parser.decode(&result.text);

    info!(
        "[ANALYSIS] request_id={} done latency_ms={} plagiarism={} ai={} segments={} sources={}",
        request_id,
        result.latency_ms,
        parsed.plagiarism.score,
        parsed.ai_generation.score,
        parsed.plagiarism.plagiarized_segments.len(),
        result.citations.len()
    );

    Ok(AnalysisOutcome {
        request_id,
        model: model.to_string(),
        language: request.language,
        latency_ms: result.latency_ms,
        plagiarism: parsed.plagiarism,
        ai_generation: parsed.ai_generation,
        sources: result.citations,
    })
}

/// True when a minimal call with this key succeeds. Blank keys never reach the network.
pub async fn validate_api_key(client: &GeminiClient, api_key: &str) -> bool {
    if api_key.trim().is_empty() {
        return false;
    }

    let request = GenerationRequest {
        contents: VALIDATION_PROMPT.to_string(),
        ..Default::default()
    };

    match client
        .generate_content(api_key, ModelVariant::Flash.model_id(), &request)
        .await
    {
        Ok(_) => {
            info!("[ANALYSIS] API key validated");
            true
        }
        Err(e) => {
            warn!("[ANALYSIS] API key validation failed: {}", e);
            false
        }
    }
}
