//! Preset browsing commands
//!
//! Lists the preset prompt library for either application mode, as a CLI
//! subcommand and as table rendering for the interactive session.

use crate::chat_mode::AppMode;
use crate::error::Result;
use crate::presets::{Preset, BEEF_UP_PRESETS, PRESETS};
use colored::Colorize;
use prettytable::{format, Table};

/// The preset list for an application mode
pub fn presets_for(mode: AppMode) -> &'static [Preset] {
    match mode {
        AppMode::Generator => PRESETS,
        AppMode::BeefUp => BEEF_UP_PRESETS,
    }
}

/// Find a preset by genre name, case-insensitively
pub fn find_preset(mode: AppMode, genre: &str) -> Option<&'static Preset> {
    presets_for(mode)
        .iter()
        .find(|p| p.genre.eq_ignore_ascii_case(genre))
}

/// Build a listing table of the presets for a mode
pub fn presets_table(mode: AppMode) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row!["Genre".bold(), "Vibe".bold()]);
    for preset in presets_for(mode) {
        table.add_row(prettytable::row![preset.genre.cyan(), preset.description]);
    }
    table
}

/// Handle the `presets` command
pub fn handle_presets(beef_up: bool) -> Result<()> {
    let mode = if beef_up {
        AppMode::BeefUp
    } else {
        AppMode::Generator
    };
    println!("\n{} presets:", mode);
    presets_table(mode).printstd();
    println!(
        "\nUse {} in a chat session to send one.\n",
        "/preset <genre>".cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_for_mode() {
        assert_eq!(presets_for(AppMode::Generator).len(), PRESETS.len());
        assert_eq!(presets_for(AppMode::BeefUp).len(), BEEF_UP_PRESETS.len());
    }

    #[test]
    fn test_find_preset_case_insensitive() {
        let preset = find_preset(AppMode::Generator, "detroit trap").unwrap();
        assert_eq!(preset.genre, "Detroit Trap");
        assert!(find_preset(AppMode::Generator, "vaporwave").is_none());
    }

    #[test]
    fn test_beef_up_presets_are_separate() {
        assert!(find_preset(AppMode::BeefUp, "Detroit Trap").is_none());
        assert!(find_preset(AppMode::BeefUp, "Low End Reconstruction").is_some());
    }

    #[test]
    fn test_presets_table_row_counts() {
        assert_eq!(
            presets_table(AppMode::Generator).len(),
            PRESETS.len() + 1
        );
        assert_eq!(
            presets_table(AppMode::BeefUp).len(),
            BEEF_UP_PRESETS.len() + 1
        );
    }
}
