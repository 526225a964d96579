//! Command implementations for Beatsmith
//!
//! This module contains the interactive chat loop, the slash-command
//! parser, and the non-interactive subcommands (auth, sessions, templates,
//! presets, analyze).

pub mod analyze;
pub mod auth;
pub mod chat;
pub mod presets;
pub mod sessions;
pub mod special;
pub mod templates;

pub use analyze::handle_analyze;
pub use auth::handle_auth;
pub use chat::{run_chat, ChatOptions};
pub use presets::handle_presets;
pub use sessions::handle_sessions;
pub use special::{parse_special_command, CommandError, SpecialCommand};
pub use templates::handle_templates;
