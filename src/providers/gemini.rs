//! Gemini provider implementation
//!
//! Talks to the Gemini REST API (`generateContent`) for persona responses,
//! speech synthesis, transcription, and audio description. Thinking mode
//! routes through the pro model with a thinking budget; search mode attaches
//! the google_search grounding tool.

use crate::config::GeminiConfig;
use crate::error::{BeatsmithError, Result};
use crate::prompts::SYSTEM_PROMPT;
use crate::providers::{
    classify_http_error, AssistantProvider, AudioAnalysis, AudioDescribeRequest, Citation,
    Generation, GenerationOptions,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default public API base; overridable for tests and local mocks
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Thinking budget passed to the pro model
const THINKING_BUDGET: u32 = 32_768;

/// Output cap applied when thinking mode is off
///
/// Must not be set together with a high thinking budget.
const MAX_OUTPUT_TOKENS: u32 = 2_000;

/// Placeholder response when the model returns no text
const STALLED_TEXT: &str = "Man, the engine stalled. Try again.";

/// Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use beatsmith::config::GeminiConfig;
/// use beatsmith::providers::{AssistantProvider, GeminiProvider, GenerationOptions};
///
/// # tokio_test::block_on(async {
/// let provider = GeminiProvider::new(GeminiConfig::default(), "api-key".to_string()).unwrap();
/// let reply = provider
///     .generate("[Technical Specs: 44.1kHz, 16-bit] dark trap", &[], GenerationOptions::default())
///     .await
///     .unwrap();
/// println!("{}", reply.text);
/// # });
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        rename = "inlineData",
        alias = "inline_data",
        skip_serializing_if = "Option::is_none"
    )]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "google_search")]
    google_search: serde_json::Value,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(rename = "groundingMetadata", default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize, Default)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize, Default)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    title: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Model names and optional API base override
    /// * `api_key` - Resolved API key (config, env, or keyring)
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: GeminiConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("beatsmith/0.1.0")
            .build()
            .map_err(|e| {
                BeatsmithError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "Initialized Gemini provider: model={}, thinking_model={}",
            config.model,
            config.thinking_model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{}/v1beta/models/{}:generateContent", base, model)
    }

    async fn send(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Gemini request failed: status={}, model={}", status, model);
            return Err(classify_http_error(status.as_u16(), &body).into());
        }

        let parsed = response.json::<GenerateResponse>().await?;
        Ok(parsed)
    }

    fn first_text(response: &GenerateResponse) -> Option<String> {
        let texts: Vec<&str> = response
            .candidates
            .first()?
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    fn citations(response: &GenerateResponse) -> Vec<Citation> {
        response
            .candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .map(|web| Citation {
                        uri: web.uri.clone(),
                        title: web.title.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl AssistantProvider for GeminiProvider {
    async fn generate(
        &self,
        prompt: &str,
        history: &[String],
        options: GenerationOptions,
    ) -> Result<Generation> {
        let model = if options.use_thinking {
            self.config.thinking_model.as_str()
        } else {
            self.config.model.as_str()
        };

        let generation_config = if options.use_thinking {
            GenerationConfig {
                temperature: Some(0.9),
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: THINKING_BUDGET,
                }),
                ..Default::default()
            }
        } else {
            GenerationConfig {
                temperature: Some(0.9),
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
                ..Default::default()
            }
        };

        let tools = if options.use_search {
            vec![Tool {
                google_search: serde_json::json!({}),
            }]
        } else {
            Vec::new()
        };

        let full_content = format!("{}\nUser: {}", history.join("\n"), prompt);

        let request = GenerateRequest {
            system_instruction: Some(Content {
                parts: vec![Part {
                    text: Some(SYSTEM_PROMPT.to_string()),
                    inline_data: None,
                }],
            }),
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(full_content),
                    inline_data: None,
                }],
            }],
            generation_config: Some(generation_config),
            tools,
        };

        let response = self.send(model, &request).await?;
        let text = Self::first_text(&response).unwrap_or_else(|| STALLED_TEXT.to_string());
        let citations = Self::citations(&response);

        Ok(Generation { text, citations })
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Option<String>> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(text.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: "Fenrir".to_string(),
                        },
                    },
                }),
                ..Default::default()
            }),
            tools: Vec::new(),
        };

        // Best-effort: synthesis failures degrade to no audio.
        match self.send(&self.config.tts_model, &request).await {
            Ok(response) => {
                let audio = response
                    .candidates
                    .first()
                    .and_then(|c| c.content.parts.first())
                    .and_then(|p| p.inline_data.as_ref())
                    .map(|d| d.data.clone());
                Ok(audio)
            }
            Err(e) => {
                tracing::warn!("Speech synthesis failed: {}", e);
                Ok(None)
            }
        }
    }

    async fn transcribe(&self, audio_base64: &str, mime_type: &str) -> Result<String> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: audio_base64.to_string(),
                        }),
                    },
                    Part {
                        text: Some(
                            "Transcribe this audio exactly as spoken. Do not add any commentary."
                                .to_string(),
                        ),
                        inline_data: None,
                    },
                ],
            }],
            generation_config: None,
            tools: Vec::new(),
        };

        let response = self.send(&self.config.model, &request).await?;
        Ok(Self::first_text(&response).unwrap_or_default())
    }

    async fn describe_audio(&self, req: &AudioDescribeRequest) -> Result<AudioAnalysis> {
        let task = format!(
            r#"Analyze this audio file (or audio description) acting as D-Hz (Master Audio Engineer).
Filename: "{}"
Duration: {}s
User Description: "{}"

Task: Perform a technical audit of the audio characteristics.
1. Detect BPM and Key accurately.
2. Analyze Spectral Balance (Low/Mid/High energy).
3. Analyze Stereo Image width.
4. Assess Transient Density (Percussiveness).
5. Provide 3 specific engineering suggestions for "Beefing Up" or producing this track in Suno V5.

Output ONLY valid JSON matching this schema:
{{
  "filename": string,
  "duration": string (e.g. "3:45"),
  "sampleRate": string (inferred, e.g. "44.1kHz"),
  "detectedBpm": string (e.g. "140 BPM"),
  "detectedKey": string (e.g. "C Minor"),
  "spectralBalance": "Dark/Muddy" | "Balanced" | "Bright/Harsh" | "Mid-Forward",
  "transientDensity": "Low (Ambient)" | "Medium (Groove)" | "High (Percussive)",
  "stereoImage": "Mono" | "Narrow" | "Wide" | "Super-Wide",
  "suggestions": [string, string, string]
}}"#,
            req.filename, req.duration_secs, req.description
        );

        let mut parts = vec![Part {
            text: Some(task),
            inline_data: None,
        }];
        if let Some(audio) = &req.audio_base64 {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: req.mime_type.clone(),
                    data: audio.clone(),
                }),
            });
        }

        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content { parts }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                ..Default::default()
            }),
            tools: Vec::new(),
        };

        let response = self.send(&self.config.model, &request).await?;
        let raw = Self::first_text(&response).unwrap_or_else(|| "{}".to_string());
        // The model sometimes wraps the payload in markdown fences despite
        // the JSON response mime type.
        let cleaned = raw.replace("```json", "").replace("```", "");
        let analysis: AudioAnalysis = serde_json::from_str(cleaned.trim()).map_err(|e| {
            BeatsmithError::Provider(format!("unparseable analysis payload: {}", e))
        })?;
        Ok(analysis)
    }
}
