//! Song-structure templates and the in-memory section list editor.
//!
//! A template is a static, named, ordered list of sections used to seed an
//! editable structure. The editor owns a deep copy of whichever template was
//! loaded; edits never touch the static data. `serialize` turns the current
//! list back into the bracketed-tag text the assistant consumes, one
//! `[Name: N Bars - Description]` line per section.

use crate::error::{BeatsmithError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use ulid::Ulid;

/// Closed set of section kinds
///
/// Kinds drive default styling and template semantics; the display `name`
/// on a record is free text and may differ from its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Intro,
    Verse,
    Chorus,
    Bridge,
    Out,
    Build,
    Drop,
    Transition,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Intro => "intro",
            Self::Verse => "verse",
            Self::Chorus => "chorus",
            Self::Bridge => "bridge",
            Self::Out => "out",
            Self::Build => "build",
            Self::Drop => "drop",
            Self::Transition => "transition",
        };
        write!(f, "{}", s)
    }
}

impl SectionKind {
    /// Parse a section kind from its lowercase name
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "intro" => Ok(Self::Intro),
            "verse" => Ok(Self::Verse),
            "chorus" => Ok(Self::Chorus),
            "bridge" => Ok(Self::Bridge),
            "out" | "outro" => Ok(Self::Out),
            "build" => Ok(Self::Build),
            "drop" => Ok(Self::Drop),
            "transition" => Ok(Self::Transition),
            other => {
                Err(BeatsmithError::Template(format!("unknown section kind: {}", other)).into())
            }
        }
    }
}

/// One section of a song structure
///
/// The identifier is immutable once assigned; name, bar count, kind, and
/// description are user-editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Immutable identifier, unique within one list
    pub id: String,
    /// Display name (free text, e.g. "Verse 1")
    pub name: String,
    /// Length in bars
    pub bars: u32,
    /// Section kind from the closed set
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Free-text engineering description
    pub description: String,
}

impl SectionRecord {
    fn new(
        id: &str,
        name: &str,
        bars: u32,
        kind: SectionKind,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            bars,
            kind,
            description: description.to_string(),
        }
    }
}

/// A static, named, ordered section list used to seed the editor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureTemplate {
    /// Stable template identifier (e.g. "viral_short")
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// One-line description of when to reach for this template
    pub description: String,
    /// Search/browse tags
    pub tags: Vec<String>,
    /// Ordered sections
    pub sections: Vec<SectionRecord>,
}

fn template(
    id: &str,
    label: &str,
    description: &str,
    tags: &[&str],
    sections: Vec<SectionRecord>,
) -> StructureTemplate {
    StructureTemplate {
        id: id.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        sections,
    }
}

/// The built-in structure templates
///
/// Constructed once and never mutated; the editor always clones before
/// editing.
pub fn templates() -> &'static [StructureTemplate] {
    static TEMPLATES: OnceLock<Vec<StructureTemplate>> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        use SectionKind::*;
        vec![
            template(
                "pop_radio",
                "Radio Standard (V-C-V-C-B-C)",
                "The industry standard for maximum retention. Good for Pop, Rap, and R&B.",
                &["Radio", "Pop", "Standard"],
                vec![
                    SectionRecord::new("1", "Intro", 4, Intro, "Atmospheric setup, establish key."),
                    SectionRecord::new("2", "Verse 1", 16, Verse, "Low energy, establish narrative."),
                    SectionRecord::new("3", "Pre-Chorus", 4, Transition, "Riser, tension build."),
                    SectionRecord::new("4", "Chorus", 8, Chorus, "Full stereo width, hook."),
                    SectionRecord::new("5", "Verse 2", 16, Verse, "Drum variation, maintained energy."),
                    SectionRecord::new("6", "Chorus", 8, Chorus, "Maximum impact."),
                    SectionRecord::new("7", "Bridge", 8, Bridge, "Melodic shift, breakdown."),
                    SectionRecord::new("8", "Chorus", 16, Chorus, "Final hook with ad-libs."),
                    SectionRecord::new("9", "Outro", 4, Out, "Fade out or hard stop."),
                ],
            ),
            template(
                "edm_banger",
                "Club Banger (Build-Drop)",
                "High energy structure for EDM, Trap, and Dubstep.",
                &["Club", "EDM", "High Energy"],
                vec![
                    SectionRecord::new("1", "Intro", 8, Intro, "DJ friendly intro, minimal drums."),
                    SectionRecord::new("2", "Breakdown", 16, Verse, "Melodic motif, no heavy bass."),
                    SectionRecord::new("3", "Build Up", 8, Build, "Snare rolls, risers, filter open."),
                    SectionRecord::new("4", "Drop", 16, Drop, "Heavy bass, main lead, maximum volume."),
                    SectionRecord::new("5", "Verse 2", 16, Verse, "Half-time feel, vocal chops."),
                    SectionRecord::new("6", "Build Up 2", 8, Build, "More aggressive riser."),
                    SectionRecord::new("7", "Drop 2", 16, Drop, "Variation of main drop."),
                    SectionRecord::new("8", "Outro", 16, Out, "DJ friendly outro, drums only."),
                ],
            ),
            template(
                "storyteller",
                "Storyteller (Extended Verses)",
                "For lyric-heavy hip-hop or folk. Focus on the verses.",
                &["Lyrical", "Hip-Hop", "Folk"],
                vec![
                    SectionRecord::new("1", "Intro", 4, Intro, "Simple loop, spoken word setup."),
                    SectionRecord::new("2", "Verse 1", 24, Verse, "Long form storytelling."),
                    SectionRecord::new("3", "Chorus", 8, Chorus, "Simple melodic anchor."),
                    SectionRecord::new("4", "Verse 2", 24, Verse, "Continuation, slight drum build."),
                    SectionRecord::new("5", "Chorus", 8, Chorus, "Full texture."),
                    SectionRecord::new("6", "Verse 3", 24, Verse, "Climax of story."),
                    SectionRecord::new("7", "Outro", 8, Out, "Beat ride out."),
                ],
            ),
            template(
                "viral_short",
                "Viral Short (Hook-First)",
                "Optimized for TikTok/Shorts. Hook plays immediately.",
                &["Social", "Short", "Punchy"],
                vec![
                    SectionRecord::new("1", "Hook", 8, Chorus, "Immediate engagement, full energy."),
                    SectionRecord::new("2", "Verse", 12, Verse, "Short context."),
                    SectionRecord::new("3", "Hook", 8, Chorus, "Reprise."),
                    SectionRecord::new("4", "Outro", 4, Out, "Quick fade."),
                ],
            ),
            template(
                "ambient_journey",
                "Ambient Journey (Slow Burn)",
                "For cinematic, lo-fi, or atmospheric tracks.",
                &["Cinematic", "Ambient", "Slow"],
                vec![
                    SectionRecord::new("1", "Intro", 16, Intro, "Textures, noise floor, pads."),
                    SectionRecord::new("2", "Swell", 8, Build, "Introduction of melodic elements."),
                    SectionRecord::new("3", "Main Theme", 32, Verse, "Steady state flow."),
                    SectionRecord::new("4", "Break", 8, Transition, "Strip back to silence."),
                    SectionRecord::new("5", "Theme Variation", 32, Verse, "Added high frequency elements."),
                    SectionRecord::new("6", "Outro", 24, Out, "Long decay to silence."),
                ],
            ),
        ]
    })
}

/// Look up a built-in template by id
pub fn find_template(id: &str) -> Option<&'static StructureTemplate> {
    templates().iter().find(|t| t.id == id)
}

/// Map an audio-analysis transient-density hint to a template id
///
/// Advisory only: the suggestion seeds the editor once and never overrides
/// an explicit user choice made afterwards.
pub fn suggest_template(transient_density: &str) -> Option<&'static str> {
    match transient_density {
        "High (Percussive)" => Some("edm_banger"),
        "Low (Ambient)" => Some("ambient_journey"),
        _ => None,
    }
}

/// Editable field of a section record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionField {
    Name,
    Bars,
    Kind,
    Description,
}

impl SectionField {
    /// Parse a field name as typed in a `/set` command
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "bars" => Ok(Self::Bars),
            "kind" | "type" => Ok(Self::Kind),
            "description" | "desc" => Ok(Self::Description),
            other => Err(BeatsmithError::Template(format!("unknown field: {}", other)).into()),
        }
    }
}

/// In-memory ordered section list with editing operations
///
/// Owns its records exclusively for the duration of an editing session;
/// nothing here persists unless [`TemplateEditor::serialize`] output is
/// spliced into a prompt.
#[derive(Debug, Clone, Default)]
pub struct TemplateEditor {
    sections: Vec<SectionRecord>,
}

impl TemplateEditor {
    /// Create an empty editor
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sections, in order
    pub fn sections(&self) -> &[SectionRecord] {
        &self.sections
    }

    /// Whether the editor holds any sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Replace the current list with a fresh copy of a built-in template
    ///
    /// The copy is a deep clone: subsequent edits never mutate the shared
    /// static template data.
    ///
    /// # Errors
    ///
    /// Returns `BeatsmithError::Template` when the id names no built-in
    /// template.
    pub fn load_template(&mut self, id: &str) -> Result<()> {
        let tpl = find_template(id)
            .ok_or_else(|| BeatsmithError::Template(format!("unknown template: {}", id)))?;
        self.sections = tpl.sections.clone();
        Ok(())
    }

    /// Move the section at `from` to position `to`
    ///
    /// Standard list move semantics: the record is removed first and
    /// reinserted into the remaining list, so `to` is interpreted relative
    /// to the list after removal. Equal or out-of-bounds indices are a
    /// silent no-op.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from == to || from >= self.sections.len() || to >= self.sections.len() {
            return;
        }
        let record = self.sections.remove(from);
        self.sections.insert(to, record);
    }

    /// Append a blank section with a generated-unique identifier
    ///
    /// Returns the new section's id.
    pub fn insert_blank(&mut self) -> String {
        let id = Ulid::new().to_string();
        self.sections.push(SectionRecord {
            id: id.clone(),
            name: "New Section".to_string(),
            bars: 8,
            kind: SectionKind::Verse,
            description: "Custom added section.".to_string(),
        });
        id
    }

    /// Remove the section with the given identifier; no-op if absent
    pub fn remove(&mut self, id: &str) {
        self.sections.retain(|s| s.id != id);
    }

    /// Replace exactly one field of the matching record
    ///
    /// All other fields and the record's position are unchanged. Bar counts
    /// are coerced to an integer; non-numeric or negative input is rejected
    /// rather than stored.
    ///
    /// # Errors
    ///
    /// Returns `BeatsmithError::Template` when the id is unknown or the
    /// value cannot be coerced to the field's type.
    pub fn update_field(&mut self, id: &str, field: SectionField, value: &str) -> Result<()> {
        let record = self
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| BeatsmithError::Template(format!("unknown section: {}", id)))?;

        match field {
            SectionField::Name => record.name = value.to_string(),
            SectionField::Bars => {
                record.bars = value.trim().parse::<u32>().map_err(|_| {
                    BeatsmithError::Template(format!("bar count must be a positive integer: {}", value))
                })?;
            }
            SectionField::Kind => record.kind = SectionKind::parse_str(value)?,
            SectionField::Description => record.description = value.to_string(),
        }
        Ok(())
    }

    /// Serialize the current list into bracketed-tag text
    ///
    /// Each record becomes `[Name: N Bars - Description]`, joined by
    /// newlines in current order. This is the sole bridge back into the
    /// prompt text the assistant consumes.
    pub fn serialize(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("[{}: {} Bars - {}]", s.name, s.bars, s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(id: &str) -> TemplateEditor {
        let mut editor = TemplateEditor::new();
        editor.load_template(id).unwrap();
        editor
    }

    #[test]
    fn test_builtin_templates_present() {
        let ids: Vec<&str> = templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "pop_radio",
                "edm_banger",
                "storyteller",
                "viral_short",
                "ambient_journey"
            ]
        );
    }

    #[test]
    fn test_load_unknown_template_errors() {
        let mut editor = TemplateEditor::new();
        assert!(editor.load_template("nope").is_err());
    }

    #[test]
    fn test_load_template_is_deep_copy() {
        let mut editor = loaded("viral_short");
        editor
            .update_field("1", SectionField::Name, "Mutated")
            .unwrap();
        editor.remove("2");

        // Static data must be untouched.
        let pristine = find_template("viral_short").unwrap();
        assert_eq!(pristine.sections[0].name, "Hook");
        assert_eq!(pristine.sections.len(), 4);

        // A fresh load sees the original data again.
        editor.load_template("viral_short").unwrap();
        assert_eq!(editor.sections()[0].name, "Hook");
        assert_eq!(editor.sections().len(), 4);
    }

    #[test]
    fn test_serialize_golden_viral_short() {
        let editor = loaded("viral_short");
        let expected = "\
[Hook: 8 Bars - Immediate engagement, full energy.]
[Verse: 12 Bars - Short context.]
[Hook: 8 Bars - Reprise.]
[Outro: 4 Bars - Quick fade.]";
        assert_eq!(editor.serialize(), expected);
    }

    #[test]
    fn test_load_then_serialize_idempotent() {
        let first = loaded("pop_radio").serialize();
        let mut editor = loaded("edm_banger");
        editor.load_template("pop_radio").unwrap();
        assert_eq!(editor.serialize(), first);
    }

    #[test]
    fn test_reorder_is_permutation() {
        let mut editor = loaded("pop_radio");
        let mut before: Vec<String> =
            editor.sections().iter().map(|s| s.id.clone()).collect();
        editor.reorder(2, 6);
        editor.reorder(8, 0);
        let mut after: Vec<String> =
            editor.sections().iter().map(|s| s.id.clone()).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_reorder_move_semantics() {
        let mut editor = loaded("viral_short");
        editor.reorder(0, 3);
        let names: Vec<&str> = editor.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Verse", "Hook", "Outro", "Hook"]);
        // The moved record is the original first Hook.
        assert_eq!(editor.sections()[3].id, "1");
    }

    #[test]
    fn test_reorder_noop_cases() {
        let mut editor = loaded("viral_short");
        let before = editor.sections().to_vec();
        editor.reorder(1, 1);
        editor.reorder(4, 0);
        editor.reorder(0, 4);
        assert_eq!(editor.sections(), before.as_slice());
    }

    #[test]
    fn test_reorder_then_serialize_end_to_end() {
        let mut editor = loaded("viral_short");
        editor.reorder(0, 3);
        let expected = "\
[Verse: 12 Bars - Short context.]
[Hook: 8 Bars - Reprise.]
[Outro: 4 Bars - Quick fade.]
[Hook: 8 Bars - Immediate engagement, full energy.]";
        assert_eq!(editor.serialize(), expected);
    }

    #[test]
    fn test_insert_blank_defaults_and_unique_ids() {
        let mut editor = loaded("viral_short");
        let a = editor.insert_blank();
        let b = editor.insert_blank();
        assert_ne!(a, b);
        let last = editor.sections().last().unwrap();
        assert_eq!(last.name, "New Section");
        assert_eq!(last.bars, 8);
        assert_eq!(last.kind, SectionKind::Verse);
        assert_eq!(editor.sections().len(), 6);
    }

    #[test]
    fn test_remove_and_remove_absent() {
        let mut editor = loaded("viral_short");
        editor.remove("2");
        assert_eq!(editor.sections().len(), 3);
        editor.remove("does-not-exist");
        assert_eq!(editor.sections().len(), 3);
    }

    #[test]
    fn test_update_field_touches_one_field_only() {
        let mut editor = loaded("viral_short");
        editor.update_field("2", SectionField::Bars, "20").unwrap();
        let record = &editor.sections()[1];
        assert_eq!(record.bars, 20);
        assert_eq!(record.name, "Verse");
        assert_eq!(record.description, "Short context.");
        assert_eq!(record.kind, SectionKind::Verse);
    }

    #[test]
    fn test_update_field_bars_rejects_non_numeric() {
        let mut editor = loaded("viral_short");
        assert!(editor.update_field("2", SectionField::Bars, "lots").is_err());
        assert!(editor.update_field("2", SectionField::Bars, "-4").is_err());
        // Record untouched after a rejected update.
        assert_eq!(editor.sections()[1].bars, 12);
    }

    #[test]
    fn test_update_field_kind() {
        let mut editor = loaded("viral_short");
        editor.update_field("4", SectionField::Kind, "drop").unwrap();
        assert_eq!(editor.sections()[3].kind, SectionKind::Drop);
        assert!(editor.update_field("4", SectionField::Kind, "megadrop").is_err());
    }

    #[test]
    fn test_update_unknown_section_errors() {
        let mut editor = loaded("viral_short");
        assert!(editor
            .update_field("99", SectionField::Name, "x")
            .is_err());
    }

    #[test]
    fn test_suggest_template_hints() {
        assert_eq!(suggest_template("High (Percussive)"), Some("edm_banger"));
        assert_eq!(suggest_template("Low (Ambient)"), Some("ambient_journey"));
        assert_eq!(suggest_template("Medium (Groove)"), None);
        assert_eq!(suggest_template(""), None);
    }

    #[test]
    fn test_section_kind_roundtrip() {
        for kind in [
            SectionKind::Intro,
            SectionKind::Verse,
            SectionKind::Chorus,
            SectionKind::Bridge,
            SectionKind::Out,
            SectionKind::Build,
            SectionKind::Drop,
            SectionKind::Transition,
        ] {
            assert_eq!(SectionKind::parse_str(&kind.to_string()).unwrap(), kind);
        }
    }

    #[test]
    fn test_section_record_serde_uses_type_key() {
        let record = SectionRecord::new("1", "Hook", 8, SectionKind::Chorus, "x");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"type\":\"chorus\""));
        let back: SectionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
