//! Command-line interface definition for Beatsmith
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat, session management, templates, presets,
//! audio analysis, and authentication.

use clap::{Parser, Subcommand};

/// Beatsmith - terminal studio for engineering Suno prompts
///
/// Converse with D-Hz, the resident audio engineer, to turn vague ideas
/// into deterministic, structured generation prompts.
#[derive(Parser, Debug, Clone)]
#[command(name = "beatsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Beatsmith
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Enable thinking mode (routes through the pro model)
        #[arg(short, long)]
        thinking: bool,

        /// Enable web-search grounding
        #[arg(short, long)]
        search: bool,

        /// Start in beef-up mode
        #[arg(short, long)]
        beef_up: bool,

        /// Resume a saved session by id
        #[arg(short, long)]
        resume: Option<String>,
    },

    /// Store or clear the API key in the system keyring
    Auth {
        /// Remove the stored API key instead of setting one
        #[arg(long)]
        clear: bool,
    },

    /// Manage saved chat sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Browse song-structure templates
    Templates {
        /// Template subcommand
        #[command(subcommand)]
        command: TemplateCommand,
    },

    /// List the preset prompt library
    Presets {
        /// Show the beef-up presets instead of the generator ones
        #[arg(short, long)]
        beef_up: bool,
    },

    /// Run the technical audit on an audio file
    Analyze {
        /// Path to the audio file
        file: String,

        /// Free-text description of the audio
        #[arg(short, long, default_value = "")]
        description: String,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List saved sessions, newest first
    List,

    /// Print a full session transcript
    Show {
        /// Session id
        id: String,
    },

    /// Delete a saved session
    Delete {
        /// Session id
        id: String,
    },
}

/// Template subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TemplateCommand {
    /// List the built-in templates
    List,

    /// Show a template's sections
    Show {
        /// Template id (e.g. viral_short)
        id: String,
    },

    /// Print a template's serialized bracketed-tag form
    Render {
        /// Template id (e.g. viral_short)
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
