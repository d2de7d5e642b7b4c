use plagai_scanner_lib::models::{
    AnalysisRequest, InputSource, Language, ModelConfig, ModelVariant, ASSESSMENT_UNAVAILABLE,
};
use plagai_scanner_lib::services::{run_analysis, validate_api_key, GeminiClient, LocaleLexicon, ScanError};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FLASH_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";
const PRO_PATH: &str = "/v1beta/models/gemini-2.5-pro:generateContent";

const EN_RESPONSE: &str = "[PLAGIARISM_ANALYSIS_START]
Plagiarism Score: 42
Overall Assessment: Partial overlap with public sources.
---
The second paragraph closely follows an encyclopedia entry.
[PLAGIARISM_ANALYSIS_END]
[PLAGIARIZED_SEGMENTS_START]
Plagiarized Segments: the quick brown fox ||| jumps over the lazy dog
[PLAGIARIZED_SEGMENTS_END]
[AI_ANALYSIS_START]
AI-Generated Score: 73
AI Assessment: Likely machine-written.
---
Uniform sentence rhythm.
[AI_ANALYSIS_END]
[HUMANIZING_SUGGESTIONS_START]
Humanizing Suggestions: Vary sentence length ||| Add a personal example
[HUMANIZING_SUGGESTIONS_END]";

fn request(language: Language, variant: ModelVariant, config: ModelConfig) -> AnalysisRequest {
    AnalysisRequest {
        submitted_text: "The quick brown fox jumps over the lazy dog.".to_string(),
        language,
        model_variant: variant,
        model_config: config,
        source: InputSource::Manual,
    }
}

fn candidate_body(text: &str, grounding: Option<Value>) -> Value {
    let mut candidate = json!({
        "content": {"role": "model", "parts": [{"text": text}]},
        "finishReason": "STOP"
    });
    if let Some(g) = grounding {
        candidate["groundingMetadata"] = g;
    }
    json!({"candidates": [candidate]})
}

#[tokio::test]
async fn analysis_sends_grounded_request_and_decodes_response() {
    let server = MockServer::start().await;
    let grounding = json!({
        "webSearchQueries": ["quick brown fox"],
        "groundingChunks": [
            {"web": {"uri": "https://example.org/fox", "title": "example.org"}},
            {"web": {"uri": "https://example.net/dog"}}
        ]
    });

    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "tools": [{"googleSearch": {}}],
            "generationConfig": {"temperature": 0.7, "topK": 40, "topP": 0.95}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(EN_RESPONSE, Some(grounding))))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(&server.uri());
    let config = LocaleLexicon::get(Language::En).default_model_config();
    let outcome = run_analysis(&client, &request(Language::En, ModelVariant::Flash, config), "test-key")
        .await
        .unwrap();

    assert_eq!(outcome.model, "gemini-2.5-flash");
    assert_eq!(outcome.plagiarism.score, 42);
    assert_eq!(outcome.plagiarism.assessment, "Partial overlap with public sources.");
    assert_eq!(
        outcome.plagiarism.analysis,
        "The second paragraph closely follows an encyclopedia entry."
    );
    assert_eq!(
        outcome.plagiarism.plagiarized_segments,
        vec!["the quick brown fox", "jumps over the lazy dog"]
    );
    assert_eq!(outcome.ai_generation.score, 73);
    assert_eq!(
        outcome.ai_generation.suggestions,
        Some(vec!["Vary sentence length".to_string(), "Add a personal example".to_string()])
    );
    assert_eq!(outcome.sources.len(), 2);
    assert_eq!(outcome.sources[0].title.as_deref(), Some("example.org"));
    assert_eq!(outcome.sources[1].uri, "https://example.net/dog");
    assert!(!outcome.request_id.is_empty());
}

#[tokio::test]
async fn request_text_is_prompt_then_submitted_text_with_system_instruction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(EN_RESPONSE, None)))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(&server.uri());
    let mut config = LocaleLexicon::get(Language::En).default_model_config();
    config.persona = "Strict reviewer".to_string();
    config.temperature = 0.2;
    config.top_k = 10;
    config.top_p = 0.5;

    let outcome = run_analysis(&client, &request(Language::En, ModelVariant::Pro, config), "k")
        .await
        .unwrap();
    assert!(outcome.sources.is_empty());

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body: Value = received[0].body_json().unwrap();

    assert_eq!(body["contents"][0]["role"], "user");
    let contents = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(contents.ends_with("---\n\nThe quick brown fox jumps over the lazy dog."));
    assert!(contents.contains("Plagiarism Score"));
    assert!(contents.contains("[PLAGIARISM_ANALYSIS_START]"));

    let system = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
    assert!(system.starts_with("# IDENTITY (PERSONA)\nStrict reviewer"));

    assert_eq!(
        body["generationConfig"],
        json!({"temperature": 0.2, "topK": 10, "topP": 0.5})
    );
}

#[tokio::test]
async fn unlabeled_response_yields_defaults_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("I cannot help with that.", None)))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(&server.uri());
    let config = LocaleLexicon::get(Language::Pt).default_model_config();
    let outcome = run_analysis(&client, &request(Language::Pt, ModelVariant::Flash, config), "k")
        .await
        .unwrap();

    assert_eq!(outcome.plagiarism.score, 0);
    assert_eq!(outcome.plagiarism.assessment, ASSESSMENT_UNAVAILABLE);
    assert!(outcome.plagiarism.plagiarized_segments.is_empty());
    assert_eq!(outcome.ai_generation.score, 0);
    assert_eq!(outcome.ai_generation.suggestions, None);
}

#[tokio::test]
async fn invalid_key_is_classified_distinctly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{"reason": "API_KEY_INVALID"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(&server.uri());
    let config = LocaleLexicon::get(Language::En).default_model_config();
    let err = run_analysis(&client, &request(Language::En, ModelVariant::Flash, config), "bad")
        .await
        .unwrap_err();

    assert_eq!(err, ScanError::InvalidCredential);
    assert_eq!(err.message_key(), "error.invalidApiKey");
}

#[tokio::test]
async fn server_error_and_missing_body_are_api_fail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PRO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(&server.uri());
    let config = LocaleLexicon::get(Language::En).default_model_config();

    let err = run_analysis(&client, &request(Language::En, ModelVariant::Flash, config.clone()), "k")
        .await
        .unwrap_err();
    assert_eq!(err.message_key(), "error.apiFail");

    let err = run_analysis(&client, &request(Language::En, ModelVariant::Pro, config), "k")
        .await
        .unwrap_err();
    assert_eq!(err.message_key(), "error.apiFail");
}

#[tokio::test]
async fn over_limit_manual_text_never_reaches_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(EN_RESPONSE, None)))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(&server.uri());
    let config = LocaleLexicon::get(Language::En).default_model_config();
    let mut req = request(Language::En, ModelVariant::Flash, config);
    req.submitted_text = "word ".repeat(1501);

    let err = run_analysis(&client, &req, "k").await.unwrap_err();
    assert!(matches!(err, ScanError::InputTooLong { words: 1501, .. }));
}

#[tokio::test]
async fn out_of_range_sampling_is_clamped_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(EN_RESPONSE, None)))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(&server.uri());
    let mut config = LocaleLexicon::get(Language::En).default_model_config();
    config.temperature = 9.0;
    config.top_k = 0;
    config.top_p = f64::NAN;

    run_analysis(&client, &request(Language::En, ModelVariant::Flash, config), "k")
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let body: Value = received[0].body_json().unwrap();
    assert_eq!(
        body["generationConfig"],
        json!({"temperature": 2.0, "topK": 1, "topP": 0.95})
    );
}

#[tokio::test]
async fn credential_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .and(header("x-goog-api-key", "good"))
        .and(body_partial_json(json!({"contents": [{"parts": [{"text": "test"}]}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("ok", None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("x-goog-api-key", "bad"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(&server.uri());
    assert!(validate_api_key(&client, "good").await);
    assert!(!validate_api_key(&client, "bad").await);
    assert!(!validate_api_key(&client, "").await);

    // Only the two non-empty keys hit the server
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
