//! Base provider trait and common types
//!
//! This module defines the AssistantProvider trait that AI backends must
//! implement, along with the request/response types shared by the chat
//! layer: generation options, citations, and the audio-analysis record.

use crate::error::{BeatsmithError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Options for a generation request
///
/// Both flags are user toggles in the chat session; they select the model
/// and attach provider tools rather than changing the prompt text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Route the request through the reasoning model with a thinking budget
    pub use_thinking: bool,
    /// Attach the web-search grounding tool
    pub use_search: bool,
}

/// A web citation attached to a grounded response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Source URI
    pub uri: String,
    /// Source page title
    pub title: String,
}

/// A completed generation: response text plus optional grounding citations
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// The assistant's response text
    pub text: String,
    /// Citations from search grounding, empty when search was off or
    /// nothing was cited
    pub citations: Vec<Citation>,
}

/// Request payload for audio description
///
/// The audio bytes are optional: when absent the model works from filename,
/// duration, and the user's own description alone.
#[derive(Debug, Clone, Default)]
pub struct AudioDescribeRequest {
    /// Original filename, echoed back in the analysis
    pub filename: String,
    /// Duration in seconds; zero when local decoding failed
    pub duration_secs: f64,
    /// Base64-encoded audio bytes, if available
    pub audio_base64: Option<String>,
    /// MIME type for the audio bytes
    pub mime_type: String,
    /// Free-text description supplied by the user
    pub description: String,
}

/// Technical audit of an uploaded audio sample
///
/// Field names follow the JSON schema the model is asked to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysis {
    /// Original filename
    pub filename: String,
    /// Duration formatted as m:ss
    pub duration: String,
    /// Inferred sample rate (e.g. "44.1kHz")
    pub sample_rate: String,
    /// Detected tempo (e.g. "140 BPM")
    pub detected_bpm: String,
    /// Detected key (e.g. "C Minor")
    pub detected_key: String,
    /// One of: Dark/Muddy, Balanced, Bright/Harsh, Mid-Forward
    pub spectral_balance: String,
    /// One of: Low (Ambient), Medium (Groove), High (Percussive)
    pub transient_density: String,
    /// One of: Mono, Narrow, Wide, Super-Wide
    pub stereo_image: String,
    /// Three engineering suggestions
    pub suggestions: Vec<String>,
}

impl AudioAnalysis {
    /// Deterministic substitute used when the analysis call fails or the
    /// payload cannot be parsed
    ///
    /// Duration is derived from the local probe; everything else is a fixed
    /// placeholder. This is the one place partial failure is absorbed
    /// rather than surfaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use beatsmith::providers::AudioAnalysis;
    ///
    /// let fallback = AudioAnalysis::fallback("loop.wav", 225.0);
    /// assert_eq!(fallback.duration, "3:45");
    /// assert_eq!(fallback.detected_bpm, "Unknown");
    /// ```
    pub fn fallback(filename: &str, duration_secs: f64) -> Self {
        let minutes = (duration_secs / 60.0).floor() as u64;
        let seconds = (duration_secs % 60.0).floor() as u64;
        Self {
            filename: filename.to_string(),
            duration: format!("{}:{:02}", minutes, seconds),
            sample_rate: "44.1kHz".to_string(),
            detected_bpm: "Unknown".to_string(),
            detected_key: "Unknown".to_string(),
            spectral_balance: "Balanced".to_string(),
            transient_density: "Medium (Groove)".to_string(),
            stereo_image: "Wide".to_string(),
            suggestions: vec![
                "Check low-end phase".to_string(),
                "Verify transient clarity".to_string(),
                "Monitor headroom".to_string(),
            ],
        }
    }
}

/// Map an HTTP status from a provider endpoint to the error taxonomy
///
/// 401/403 are credential failures, 429/503 transient overload, 404 a
/// missing model or endpoint; anything else is a generic provider error.
///
/// # Arguments
///
/// * `status` - HTTP status code returned by the endpoint
/// * `body` - Response body for error context
pub fn classify_http_error(status: u16, body: &str) -> BeatsmithError {
    match status {
        401 | 403 => BeatsmithError::MissingCredentials(format!("gemini (HTTP {})", status)),
        429 | 503 => BeatsmithError::Overloaded(format!("HTTP {}: {}", status, body)),
        404 => BeatsmithError::NotFound(format!("HTTP 404: {}", body)),
        _ => BeatsmithError::Provider(format!("HTTP {}: {}", status, body)),
    }
}

/// Provider trait for assistant backends
///
/// The chat layer drives everything through this trait; the only shipping
/// implementation talks to the Gemini REST API.
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Generate a persona response for a composed prompt
    ///
    /// # Arguments
    ///
    /// * `prompt` - The composed prompt (specs prefix, context, user text)
    /// * `history` - Prior conversation as pre-rendered `User:`/`D-Hz:` lines
    /// * `options` - Thinking and search toggles
    ///
    /// # Errors
    ///
    /// Returns credential, overload, not-found, or generic provider errors;
    /// the chat layer surfaces these as system messages without retrying.
    async fn generate(
        &self,
        prompt: &str,
        history: &[String],
        options: GenerationOptions,
    ) -> Result<Generation>;

    /// Synthesize speech for a piece of response text
    ///
    /// Best-effort: returns base64 audio bytes, or `None` when synthesis
    /// is unavailable or fails. Absence is a valid non-error outcome.
    async fn synthesize_speech(&self, _text: &str) -> Result<Option<String>> {
        Ok(None)
    }

    /// Transcribe recorded audio to text
    ///
    /// # Arguments
    ///
    /// * `audio_base64` - Base64-encoded audio bytes
    /// * `mime_type` - MIME type of the audio payload
    ///
    /// # Errors
    ///
    /// Returns an error on missing credentials or endpoint failure.
    async fn transcribe(&self, audio_base64: &str, mime_type: &str) -> Result<String>;

    /// Run a technical audit of an audio sample
    ///
    /// # Errors
    ///
    /// Propagates endpoint and parse failures; callers substitute
    /// [`AudioAnalysis::fallback`] instead of surfacing them.
    async fn describe_audio(&self, request: &AudioDescribeRequest) -> Result<AudioAnalysis>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_duration_formatting() {
        assert_eq!(AudioAnalysis::fallback("a.wav", 225.0).duration, "3:45");
        assert_eq!(AudioAnalysis::fallback("a.wav", 0.0).duration, "0:00");
        assert_eq!(AudioAnalysis::fallback("a.wav", 61.5).duration, "1:01");
        assert_eq!(AudioAnalysis::fallback("a.wav", 9.0).duration, "0:09");
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let a = AudioAnalysis::fallback("x.mp3", 120.0);
        let b = AudioAnalysis::fallback("x.mp3", 120.0);
        assert_eq!(a, b);
        assert_eq!(a.suggestions.len(), 3);
        assert_eq!(a.spectral_balance, "Balanced");
        assert_eq!(a.transient_density, "Medium (Groove)");
        assert_eq!(a.stereo_image, "Wide");
    }

    #[test]
    fn test_classify_http_error_categories() {
        assert!(matches!(
            classify_http_error(401, ""),
            BeatsmithError::MissingCredentials(_)
        ));
        assert!(matches!(
            classify_http_error(403, ""),
            BeatsmithError::MissingCredentials(_)
        ));
        assert!(matches!(
            classify_http_error(429, "slow down"),
            BeatsmithError::Overloaded(_)
        ));
        assert!(matches!(
            classify_http_error(503, "overloaded"),
            BeatsmithError::Overloaded(_)
        ));
        assert!(matches!(
            classify_http_error(404, "no model"),
            BeatsmithError::NotFound(_)
        ));
        assert!(matches!(
            classify_http_error(500, "boom"),
            BeatsmithError::Provider(_)
        ));
    }

    #[test]
    fn test_audio_analysis_json_uses_camel_case() {
        let json = r#"{
            "filename": "beat.mp3",
            "duration": "2:10",
            "sampleRate": "48kHz",
            "detectedBpm": "92 BPM",
            "detectedKey": "F Minor",
            "spectralBalance": "Mid-Forward",
            "transientDensity": "High (Percussive)",
            "stereoImage": "Super-Wide",
            "suggestions": ["a", "b", "c"]
        }"#;
        let analysis: AudioAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.sample_rate, "48kHz");
        assert_eq!(analysis.detected_bpm, "92 BPM");
        assert_eq!(analysis.stereo_image, "Super-Wide");

        let back = serde_json::to_string(&analysis).unwrap();
        assert!(back.contains("\"sampleRate\""));
        assert!(back.contains("\"detectedBpm\""));
    }
}
