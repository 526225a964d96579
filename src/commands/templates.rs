//! Template browsing commands
//!
//! Implements the `templates` CLI subcommands and the table rendering
//! shared with the interactive session.

use crate::cli::TemplateCommand;
use crate::error::Result;
use crate::template::{find_template, templates, SectionRecord, TemplateEditor};
use colored::Colorize;
use prettytable::{format, Table};

/// Build a listing table of the built-in templates
pub fn templates_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Name".bold(),
        "Sections".bold(),
        "Description".bold()
    ]);
    for tpl in templates() {
        table.add_row(prettytable::row![
            tpl.id.cyan(),
            tpl.label,
            tpl.sections.len(),
            tpl.description
        ]);
    }
    table
}

/// Build a table of sections with their list positions
pub fn sections_table(sections: &[SectionRecord]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "#".bold(),
        "Name".bold(),
        "Bars".bold(),
        "Type".bold(),
        "Description".bold()
    ]);
    for (index, section) in sections.iter().enumerate() {
        table.add_row(prettytable::row![
            index,
            section.name,
            section.bars,
            section.kind.to_string(),
            section.description
        ]);
    }
    table
}

/// Handle the `templates` subcommands
///
/// # Errors
///
/// Returns `BeatsmithError::Template` for unknown template ids
pub fn handle_templates(command: TemplateCommand) -> Result<()> {
    match command {
        TemplateCommand::List => {
            println!("\nStructure Templates:");
            templates_table().printstd();
            println!();
        }
        TemplateCommand::Show { id } => {
            let tpl = find_template(&id).ok_or_else(|| {
                crate::error::BeatsmithError::Template(format!("unknown template: {}", id))
            })?;
            println!("\n{} ({})", tpl.label.bold(), tpl.id.cyan());
            println!("{}", tpl.description);
            println!("Tags: {}", tpl.tags.join(", ").dimmed());
            sections_table(&tpl.sections).printstd();
            println!();
        }
        TemplateCommand::Render { id } => {
            let mut editor = TemplateEditor::new();
            editor.load_template(&id)?;
            println!("{}", editor.serialize());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_table_lists_all() {
        let table = templates_table();
        // Header plus one row per built-in template
        assert_eq!(table.len(), templates().len() + 1);
    }

    #[test]
    fn test_sections_table_counts() {
        let tpl = find_template("viral_short").unwrap();
        let table = sections_table(&tpl.sections);
        assert_eq!(table.len(), tpl.sections.len() + 1);
    }

    #[test]
    fn test_handle_show_unknown() {
        assert!(handle_templates(TemplateCommand::Show {
            id: "nope".to_string()
        })
        .is_err());
    }

    #[test]
    fn test_handle_render_known() {
        assert!(handle_templates(TemplateCommand::Render {
            id: "viral_short".to_string()
        })
        .is_ok());
    }
}
