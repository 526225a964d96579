use serde_json::json;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use beatsmith::config::GeminiConfig;
use beatsmith::error::BeatsmithError;
use beatsmith::providers::{
    AssistantProvider, AudioDescribeRequest, GeminiProvider, GenerationOptions,
};

fn provider_for(server: &MockServer) -> GeminiProvider {
    let cfg = GeminiConfig {
        api_base: Some(server.uri()),
        ..Default::default()
    };
    GeminiProvider::new(cfg, "test-key".to_string()).unwrap()
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    }))
}

#[tokio::test]
async fn test_generate_returns_text() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
        .respond_with(text_response("What up doe? Say less."))
        .expect(1)
        .mount(&server)
        .await;

    let generation = provider
        .generate("dark trap", &[], GenerationOptions::default())
        .await
        .unwrap();
    assert_eq!(generation.text, "What up doe? Say less.");
    assert!(generation.citations.is_empty());
}

#[tokio::test]
async fn test_generate_joins_history_into_content() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [{ "text": "User: first ask\nD-Hz: first answer\nUser: run it back" }]
            }]
        })))
        .respond_with(text_response("Bet."))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![
        "User: first ask".to_string(),
        "D-Hz: first answer".to_string(),
    ];
    let generation = provider
        .generate("run it back", &history, GenerationOptions::default())
        .await
        .unwrap();
    assert_eq!(generation.text, "Bet.");
}

#[tokio::test]
async fn test_thinking_mode_routes_to_pro_model_with_budget() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-pro-preview:generateContent"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "thinkingConfig": { "thinkingBudget": 32768 }
            }
        })))
        .respond_with(text_response("deep cut"))
        .expect(1)
        .mount(&server)
        .await;

    let options = GenerationOptions {
        use_thinking: true,
        use_search: false,
    };
    let generation = provider.generate("go deep", &[], options).await.unwrap();
    assert_eq!(generation.text, "deep cut");
}

#[tokio::test]
async fn test_search_mode_attaches_grounding_tool_and_citations() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
        .and(body_partial_json(json!({
            "tools": [{ "google_search": {} }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "grounded answer" }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://example.com/a", "title": "Source A" } }
                    ]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = GenerationOptions {
        use_thinking: false,
        use_search: true,
    };
    let generation = provider.generate("what's new", &[], options).await.unwrap();
    assert_eq!(generation.citations.len(), 1);
    assert_eq!(generation.citations[0].title, "Source A");
}

#[tokio::test]
async fn test_empty_candidates_yield_stalled_placeholder() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let generation = provider
        .generate("anything", &[], GenerationOptions::default())
        .await
        .unwrap();
    assert_eq!(generation.text, "Man, the engine stalled. Try again.");
}

#[tokio::test]
async fn test_credential_error_classification() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = provider
        .generate("anything", &[], GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BeatsmithError>(),
        Some(BeatsmithError::MissingCredentials(_))
    ));
}

#[tokio::test]
async fn test_overload_error_classification() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = provider
        .generate("anything", &[], GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BeatsmithError>(),
        Some(BeatsmithError::Overloaded(_))
    ));
}

#[tokio::test]
async fn test_transcribe_sends_inline_audio() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": "audio/wav", "data": "QUJD" } },
                    {}
                ]
            }]
        })))
        .respond_with(text_response("make it knock"))
        .expect(1)
        .mount(&server)
        .await;

    let text = provider.transcribe("QUJD", "audio/wav").await.unwrap();
    assert_eq!(text, "make it knock");
}

#[tokio::test]
async fn test_describe_audio_strips_markdown_fences() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    let payload = r#"```json
{
  "filename": "loop.wav",
  "duration": "0:42",
  "sampleRate": "44.1kHz",
  "detectedBpm": "140 BPM",
  "detectedKey": "C Minor",
  "spectralBalance": "Dark/Muddy",
  "transientDensity": "High (Percussive)",
  "stereoImage": "Narrow",
  "suggestions": ["a", "b", "c"]
}
```"#;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(text_response(payload))
        .expect(1)
        .mount(&server)
        .await;

    let request = AudioDescribeRequest {
        filename: "loop.wav".to_string(),
        duration_secs: 42.0,
        audio_base64: Some("QUJD".to_string()),
        mime_type: "audio/wav".to_string(),
        description: "drum break".to_string(),
    };
    let analysis = provider.describe_audio(&request).await.unwrap();
    assert_eq!(analysis.detected_bpm, "140 BPM");
    assert_eq!(analysis.transient_density, "High (Percussive)");
}

#[tokio::test]
async fn test_describe_audio_unparseable_payload_errors() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .respond_with(text_response("not json at all"))
        .mount(&server)
        .await;

    let request = AudioDescribeRequest {
        filename: "loop.wav".to_string(),
        duration_secs: 42.0,
        audio_base64: None,
        mime_type: "audio/wav".to_string(),
        description: String::new(),
    };
    assert!(provider.describe_audio(&request).await.is_err());
}

#[tokio::test]
async fn test_synthesize_speech_failure_degrades_to_none() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("tts down"))
        .mount(&server)
        .await;

    let audio = provider.synthesize_speech("say less").await.unwrap();
    assert!(audio.is_none());
}

#[tokio::test]
async fn test_synthesize_speech_returns_inline_audio() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash-preview-tts:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": { "mimeType": "audio/pcm", "data": "UENN" }
                    }]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let audio = provider.synthesize_speech("say less").await.unwrap();
    assert_eq!(audio, Some("UENN".to_string()));
}
