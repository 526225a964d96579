//! Beatsmith - terminal studio for engineering Suno prompts
//!
//! This library provides the core functionality for the Beatsmith chat
//! studio: the D-Hz assistant persona, bracket-tag autosuggest, structure
//! flow extraction, the template list editor, presets, audio analysis, and
//! session persistence.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `tags`: bracket-tag autosuggest matching and insertion
//! - `flow`: section-tag flow extraction from assistant replies
//! - `template`: structure templates and the section list editor
//! - `presets`: preset prompt library and conflicting-tag detection
//! - `prompts`: the persona system prompt and outgoing-prompt composition
//! - `providers`: assistant provider abstraction and the Gemini backend
//! - `session`: chat session persistence
//! - `audio`: audio file intake and WAV duration probing
//! - `commands`: interactive chat loop and CLI subcommands
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use beatsmith::config::Config;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::load("config.yaml")?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod chat_mode;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod flow;
pub mod presets;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod tags;
pub mod template;

// Re-export commonly used types
pub use chat_mode::AppMode;
pub use config::Config;
pub use error::{BeatsmithError, Result};
pub use flow::{extract_flow, SectionCategory, SectionTag};
pub use tags::{insert_tag, match_input, suggestions, MatchResult};
pub use template::{StructureTemplate, TemplateEditor};
