//! Provider module for Beatsmith
//!
//! This module contains the assistant provider abstraction and the Gemini
//! implementation.

pub mod base;
pub mod gemini;

pub use base::{
    classify_http_error, AssistantProvider, AudioAnalysis, AudioDescribeRequest, Citation,
    Generation, GenerationOptions,
};
pub use gemini::GeminiProvider;

use crate::config::ProviderConfig;
use crate::error::Result;

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
/// * `api_key` - Resolved API key for the backend
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
pub fn create_provider(
    config: &ProviderConfig,
    api_key: String,
) -> Result<Box<dyn AssistantProvider>> {
    match config.provider_type.as_str() {
        "gemini" => Ok(Box::new(GeminiProvider::new(
            config.gemini.clone(),
            api_key,
        )?)),
        other => Err(crate::error::BeatsmithError::Provider(format!(
            "Unknown provider type: {}",
            other
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;

    #[test]
    fn test_create_provider_gemini() {
        let config = ProviderConfig {
            provider_type: "gemini".to_string(),
            gemini: GeminiConfig::default(),
        };
        let result = create_provider(&config, "key".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_provider_invalid_type() {
        let config = ProviderConfig {
            provider_type: "invalid".to_string(),
            gemini: GeminiConfig::default(),
        };
        let result = create_provider(&config, "key".to_string());
        assert!(result.is_err());
    }
}
