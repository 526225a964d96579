//! API key management
//!
//! Resolves the Gemini API key from config, environment, or the system
//! keyring, and implements the `auth` command for storing and clearing the
//! keyring entry.

use crate::config::Config;
use crate::error::{BeatsmithError, Result};
use colored::Colorize;

/// Keyring service name for stored credentials
const KEYRING_SERVICE: &str = "beatsmith";

/// Keyring user name for the Gemini key
const KEYRING_USER: &str = "gemini";

/// Environment variable consulted before the keyring
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Resolve the API key for the configured provider
///
/// Resolution order: config file, `GEMINI_API_KEY` environment variable,
/// system keyring.
///
/// # Errors
///
/// Returns `BeatsmithError::MissingCredentials` when no source yields a key
pub fn resolve_api_key(config: &Config) -> Result<String> {
    if let Some(key) = &config.provider.gemini.api_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    match entry.get_password() {
        Ok(key) => Ok(key),
        Err(keyring::Error::NoEntry) => Err(BeatsmithError::MissingCredentials(
            "No API key found. Set GEMINI_API_KEY or run 'beatsmith auth'".to_string(),
        )
        .into()),
        Err(e) => Err(e.into()),
    }
}

/// Store an API key in the system keyring
///
/// # Errors
///
/// Returns error if the keyring entry cannot be written
pub fn store_api_key(key: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    entry.set_password(key)?;
    tracing::info!("Stored API key in system keyring");
    Ok(())
}

/// Remove the API key from the system keyring
///
/// # Returns
///
/// Returns true if an entry was removed, false if none existed
///
/// # Errors
///
/// Returns error on keyring failures other than a missing entry
pub fn clear_api_key() -> Result<bool> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    match entry.delete_password() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Handle the `auth` command
///
/// Prompts for an API key and stores it in the keyring, or clears the
/// stored entry when `clear` is set.
///
/// # Errors
///
/// Returns error on prompt or keyring failures
pub fn handle_auth(clear: bool) -> Result<()> {
    if clear {
        if clear_api_key()? {
            println!("{}", "Removed stored API key.".green());
        } else {
            println!("No stored API key to remove.");
        }
        return Ok(());
    }

    let mut editor = rustyline::DefaultEditor::new()
        .map_err(|e| BeatsmithError::Config(format!("Failed to start prompt: {}", e)))?;
    let key = editor
        .readline("Gemini API key: ")
        .map_err(|e| BeatsmithError::Config(format!("Failed to read input: {}", e)))?;
    let key = key.trim();

    if key.is_empty() {
        return Err(BeatsmithError::MissingCredentials("Empty API key".to_string()).into());
    }

    store_api_key(key)?;
    println!("{}", "API key stored in system keyring.".green());
    Ok(())
}
