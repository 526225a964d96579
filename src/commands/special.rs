//! Special commands parser for interactive chat mode
//!
//! This module parses the special commands that can be entered during an
//! interactive session. Special commands allow users to:
//! - Switch between Generator and Beef-Up modes
//! - Toggle thinking mode and search grounding
//! - Load, edit, and inject structure templates
//! - Browse presets and run the audio-analysis flow
//! - Manage saved sessions
//!
//! Commands are prefixed with `/`; the command word is case-insensitive.

use crate::chat_mode::AppMode;
use crate::template::SectionField;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands modify the session state or provide information,
/// rather than being sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Switch the application mode (generator or beefup)
    SwitchMode(AppMode),

    /// Set the technical-spec fidelity settings (sample rate, bit depth)
    SetSpecs {
        sample_rate: String,
        bit_depth: String,
    },

    /// Toggle thinking mode; None toggles, Some sets explicitly
    ToggleThinking(Option<bool>),

    /// Toggle search grounding; None toggles, Some sets explicitly
    ToggleSearch(Option<bool>),

    /// List the built-in structure templates
    ListTemplates,

    /// Load a structure template into the editor by id
    LoadTemplate(String),

    /// Move a section in the editor from one position to another
    MoveSection { from: usize, to: usize },

    /// Insert a blank section, optionally at a position (appends otherwise)
    AddSection(Option<usize>),

    /// Remove the section at a position
    RemoveSection(usize),

    /// Update one field of the section at a position
    SetField {
        index: usize,
        field: SectionField,
        value: String,
    },

    /// Serialize the editor contents into the next outgoing prompt
    InjectStructure,

    /// List the preset prompt library for the active mode
    ListPresets,

    /// Send a preset request by genre name
    UsePreset(String),

    /// Analyze an audio file, with an optional description
    Analyze { path: String, description: String },

    /// Transcribe an audio file and send the transcript as the prompt
    Hear(String),

    /// Speak the last assistant reply aloud
    Speak,

    /// Start a fresh session
    NewSession,

    /// List saved sessions
    ListSessions,

    /// Load a saved session by id
    LoadSession(String),

    /// Delete a saved session by id
    DeleteSession(String),

    /// Branch the session at an earlier message and answer from there
    ReplyAt(String),

    /// Display current mode, toggles, and spec settings
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be processed as a regular prompt.
    None,
}

fn missing(command: &str, usage: &str) -> CommandError {
    CommandError::MissingArgument {
        command: command.to_string(),
        usage: usage.to_string(),
    }
}

fn unsupported(command: &str, arg: &str) -> CommandError {
    CommandError::UnsupportedArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    }
}

fn parse_index(command: &str, arg: &str) -> Result<usize, CommandError> {
    arg.parse::<usize>().map_err(|_| unsupported(command, arg))
}

fn parse_toggle(command: &str, rest: &str) -> Result<Option<bool>, CommandError> {
    match rest {
        "" => Ok(None),
        "on" => Ok(Some(true)),
        "off" => Ok(Some(false)),
        other => Err(unsupported(command, other)),
    }
}

/// Parse a user input string into a special command
///
/// The command word is case-insensitive; arguments keep their original
/// case (template ids, file paths, field values).
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None
/// for non-commands.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not
/// a valid command, CommandError::UnsupportedArgument for a bad argument,
/// and CommandError::MissingArgument when a required argument is absent.
///
/// # Examples
///
/// ```
/// use beatsmith::commands::special::{parse_special_command, SpecialCommand};
/// use beatsmith::chat_mode::AppMode;
///
/// let cmd = parse_special_command("/mode beefup").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchMode(AppMode::BeefUp));
///
/// let cmd = parse_special_command("make it darker").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/bogus").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    if matches!(lower.as_str(), "exit" | "quit" | "/exit" | "/quit") {
        return Ok(SpecialCommand::Exit);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("").to_lowercase();
    let rest = parts.next().unwrap_or("").trim();

    match command.as_str() {
        "/mode" => {
            if rest.is_empty() {
                return Err(missing("/mode", "/mode <generator|beefup>"));
            }
            AppMode::parse_str(rest)
                .map(SpecialCommand::SwitchMode)
                .map_err(|_| unsupported("/mode", rest))
        }

        "/specs" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next(), args.next()) {
                (Some(rate), Some(depth), None) => Ok(SpecialCommand::SetSpecs {
                    sample_rate: rate.to_string(),
                    bit_depth: depth.to_string(),
                }),
                _ => Err(missing("/specs", "/specs <sample_rate> <bit_depth>")),
            }
        }

        "/think" => parse_toggle("/think", rest).map(SpecialCommand::ToggleThinking),
        "/search" => parse_toggle("/search", rest).map(SpecialCommand::ToggleSearch),

        "/templates" => {
            if rest.is_empty() {
                Ok(SpecialCommand::ListTemplates)
            } else {
                Err(unsupported("/templates", rest))
            }
        }

        "/template" => {
            if rest.is_empty() {
                return Err(missing("/template", "/template <id>"));
            }
            Ok(SpecialCommand::LoadTemplate(rest.to_string()))
        }

        "/move" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next(), args.next()) {
                (Some(from), Some(to), None) => Ok(SpecialCommand::MoveSection {
                    from: parse_index("/move", from)?,
                    to: parse_index("/move", to)?,
                }),
                _ => Err(missing("/move", "/move <from> <to>")),
            }
        }

        "/add" => {
            if rest.is_empty() {
                Ok(SpecialCommand::AddSection(None))
            } else {
                Ok(SpecialCommand::AddSection(Some(parse_index("/add", rest)?)))
            }
        }

        "/remove" => {
            if rest.is_empty() {
                return Err(missing("/remove", "/remove <index>"));
            }
            Ok(SpecialCommand::RemoveSection(parse_index("/remove", rest)?))
        }

        "/set" => {
            let mut args = rest.splitn(3, char::is_whitespace);
            match (args.next(), args.next(), args.next()) {
                (Some(index), Some(field), Some(value)) if !value.trim().is_empty() => {
                    Ok(SpecialCommand::SetField {
                        index: parse_index("/set", index)?,
                        field: SectionField::parse_str(field)
                            .map_err(|_| unsupported("/set", field))?,
                        value: value.trim().to_string(),
                    })
                }
                _ => Err(missing("/set", "/set <index> <name|bars|type|description> <value>")),
            }
        }

        "/inject" => {
            if rest.is_empty() {
                Ok(SpecialCommand::InjectStructure)
            } else {
                Err(unsupported("/inject", rest))
            }
        }

        "/presets" => {
            if rest.is_empty() {
                Ok(SpecialCommand::ListPresets)
            } else {
                Err(unsupported("/presets", rest))
            }
        }

        "/preset" => {
            if rest.is_empty() {
                return Err(missing("/preset", "/preset <genre>"));
            }
            Ok(SpecialCommand::UsePreset(rest.to_string()))
        }

        "/analyze" => {
            if rest.is_empty() {
                return Err(missing("/analyze", "/analyze <file> [description]"));
            }
            let mut args = rest.splitn(2, char::is_whitespace);
            let path = args.next().unwrap_or("").to_string();
            let description = args.next().unwrap_or("").trim().to_string();
            Ok(SpecialCommand::Analyze { path, description })
        }

        "/hear" => {
            if rest.is_empty() {
                return Err(missing("/hear", "/hear <file>"));
            }
            Ok(SpecialCommand::Hear(rest.to_string()))
        }

        "/say" => {
            if rest.is_empty() {
                Ok(SpecialCommand::Speak)
            } else {
                Err(unsupported("/say", rest))
            }
        }

        "/new" => Ok(SpecialCommand::NewSession),
        "/sessions" => Ok(SpecialCommand::ListSessions),

        "/load" => {
            if rest.is_empty() {
                return Err(missing("/load", "/load <session_id>"));
            }
            Ok(SpecialCommand::LoadSession(rest.to_string()))
        }

        "/delete" => {
            if rest.is_empty() {
                return Err(missing("/delete", "/delete <session_id>"));
            }
            Ok(SpecialCommand::DeleteSession(rest.to_string()))
        }

        "/reply" => {
            if rest.is_empty() {
                return Err(missing("/reply", "/reply <message_id>"));
            }
            Ok(SpecialCommand::ReplyAt(rest.to_string()))
        }

        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),

        _ => Err(CommandError::UnknownCommand(command)),
    }
}

/// Help text for the interactive session
pub fn help_text() -> &'static str {
    r#"Available commands:
  /mode <generator|beefup>   Switch application mode
  /specs <rate> <depth>      Set technical specs (e.g. /specs 48kHz 24-bit)
  /think [on|off]            Toggle thinking mode (pro model)
  /search [on|off]           Toggle web-search grounding
  /templates                 List structure templates
  /template <id>             Load a template into the editor
  /move <from> <to>          Reorder editor sections
  /add [index]               Insert a blank section
  /remove <index>            Remove a section
  /set <i> <field> <value>   Edit a section (name|bars|type|description)
  /inject                    Inject the structure into the next prompt
  /presets                   List preset prompts for the active mode
  /preset <genre>            Send a preset request
  /analyze <file> [desc]     Run the audio audit on a file
  /hear <file>               Transcribe an audio file and send it as the prompt
  /say                       Speak the last reply aloud
  /new                       Start a fresh session
  /sessions                  List saved sessions
  /load <session_id>         Load a saved session
  /delete <session_id>       Delete a saved session
  /reply <message_id>        Branch the session at a message
  /status                    Show current mode and settings
  /help                      Show this help
  exit | quit                Leave the session"#
}
