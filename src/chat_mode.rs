//! Chat mode types for interactive sessions
//!
//! This module defines the two application modes:
//! - Generator mode: engineering a prompt from scratch
//! - BeefUp mode: enhancing an uploaded sample description

use colored::Colorize;
use std::fmt;

/// Application mode for interactive sessions
///
/// Determines how outgoing prompts are framed for the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Generator mode: build an engineered style prompt from scratch
    #[default]
    Generator,

    /// Beef-up mode: treat the input as a description of a latent seed
    /// sample and apply the signal-chain enhancement protocol
    BeefUp,
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generator => write!(f, "GENERATOR"),
            Self::BeefUp => write!(f, "BEEF_UP"),
        }
    }
}

impl AppMode {
    /// Parse an app mode from a string
    ///
    /// # Arguments
    ///
    /// * `s` - String representation ("generator" or "beefup"/"beef_up"/"beef-up")
    ///
    /// # Examples
    ///
    /// ```
    /// use beatsmith::chat_mode::AppMode;
    ///
    /// let mode = AppMode::parse_str("beefup").unwrap();
    /// assert_eq!(mode, AppMode::BeefUp);
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "generator" | "gen" => Ok(Self::Generator),
            "beefup" | "beef_up" | "beef-up" => Ok(Self::BeefUp),
            other => Err(format!("Unknown app mode: {}", other)),
        }
    }

    /// Get a user-friendly description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            Self::Generator => "Engineer a style prompt from scratch",
            Self::BeefUp => "Enhance an uploaded sample with the signal-chain protocol",
        }
    }

    /// Get a colored tag representation of this mode for the prompt line
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Generator => format!("[{}]", "GENERATOR".cyan()),
            Self::BeefUp => format!("[{}]", "BEEF_UP".red()),
        }
    }
}
