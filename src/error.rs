//! Error types for Beatsmith
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Beatsmith operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, provider interactions, session storage,
/// and local audio intake.
#[derive(Error, Debug)]
pub enum BeatsmithError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing or rejected API credentials for a provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Provider is overloaded or rate limiting requests
    #[error("Provider overloaded: {0}")]
    Overloaded(String),

    /// Requested model or endpoint does not exist
    #[error("Model or endpoint not found: {0}")]
    NotFound(String),

    /// Session storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Local audio intake errors (unreadable file, undecodable header)
    #[error("Audio error: {0}")]
    Audio(String),

    /// Template editing errors (unknown template id, bad field value)
    #[error("Template error: {0}")]
    Template(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for Beatsmith operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = BeatsmithError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_provider_error_display() {
        let error = BeatsmithError::Provider("API timeout".to_string());
        assert_eq!(error.to_string(), "Provider error: API timeout");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = BeatsmithError::MissingCredentials("gemini".to_string());
        assert_eq!(
            error.to_string(),
            "Missing credentials for provider: gemini"
        );
    }

    #[test]
    fn test_overloaded_error_display() {
        let error = BeatsmithError::Overloaded("429 Too Many Requests".to_string());
        assert_eq!(
            error.to_string(),
            "Provider overloaded: 429 Too Many Requests"
        );
    }

    #[test]
    fn test_not_found_error_display() {
        let error = BeatsmithError::NotFound("gemini-3-pro-preview".to_string());
        assert_eq!(
            error.to_string(),
            "Model or endpoint not found: gemini-3-pro-preview"
        );
    }

    #[test]
    fn test_storage_error_display() {
        let error = BeatsmithError::Storage("database open failed".to_string());
        assert_eq!(error.to_string(), "Storage error: database open failed");
    }

    #[test]
    fn test_audio_error_display() {
        let error = BeatsmithError::Audio("not a RIFF file".to_string());
        assert_eq!(error.to_string(), "Audio error: not a RIFF file");
    }

    #[test]
    fn test_template_error_display() {
        let error = BeatsmithError::Template("unknown template: foo".to_string());
        assert_eq!(error.to_string(), "Template error: unknown template: foo");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: BeatsmithError = io_error.into();
        assert!(matches!(error, BeatsmithError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "{invalid json}";
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let error: BeatsmithError = json_error.into();
        assert!(matches!(error, BeatsmithError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "invalid: : yaml";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: BeatsmithError = yaml_error.into();
        assert!(matches!(error, BeatsmithError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BeatsmithError>();
    }
}
