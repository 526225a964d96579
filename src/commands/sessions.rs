//! Saved-session management commands
//!
//! Implements the `sessions` CLI subcommands and the session table shared
//! with the interactive session.

use crate::cli::SessionCommand;
use crate::error::{BeatsmithError, Result};
use crate::session::{ChatSession, MessageRole, SessionStore};
use colored::Colorize;
use prettytable::{format, Table};

/// Build a listing table for saved sessions
pub fn sessions_table(sessions: &[ChatSession]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Title".bold(),
        "Messages".bold(),
        "Created".bold()
    ]);
    for session in sessions {
        table.add_row(prettytable::row![
            session.id.cyan(),
            session.title,
            session.messages.len(),
            session.timestamp
        ]);
    }
    table
}

/// Print a full session transcript
pub fn print_transcript(session: &ChatSession) {
    println!("\n{} ({})", session.title.bold(), session.id.cyan());
    for message in &session.messages {
        let speaker = match message.role {
            MessageRole::User => "You".green().to_string(),
            MessageRole::Assistant => "D-Hz".cyan().to_string(),
            MessageRole::System => "[system]".dimmed().to_string(),
        };
        println!("\n{} {}", speaker, message.id.dimmed());
        println!("{}", message.content);
        for citation in &message.citations {
            println!("  {} {}", "src:".dimmed(), citation.uri.dimmed());
        }
    }
    println!();
}

/// Handle the `sessions` subcommands
///
/// # Errors
///
/// Returns `BeatsmithError::NotFound` for unknown session ids and
/// `BeatsmithError::Storage` on database failures
pub fn handle_sessions(store: &SessionStore, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::List => {
            let sessions = store.list()?;
            if sessions.is_empty() {
                println!("No saved sessions.");
                return Ok(());
            }
            println!("\nSaved Sessions:");
            sessions_table(&sessions).printstd();
            println!(
                "\nUse {} to resume one.\n",
                "beatsmith chat --resume <id>".cyan()
            );
        }
        SessionCommand::Show { id } => {
            let session = store
                .get(&id)?
                .ok_or_else(|| BeatsmithError::NotFound(format!("No session with id {}", id)))?;
            print_transcript(&session);
        }
        SessionCommand::Delete { id } => {
            if store.delete(&id)? {
                println!("{}", format!("Deleted session {}.", id).green());
            } else {
                return Err(
                    BeatsmithError::NotFound(format!("No session with id {}", id)).into(),
                );
            }
        }
    }
    Ok(())
}
