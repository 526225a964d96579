//! Structure-tag flow extraction from assistant output.
//!
//! Engineered prompts carry their song structure as bracketed section tags
//! (`[Intro]`, `[Verse 1]`, `[Chorus: high energy]`). This module pulls the
//! ordered sequence of recognized tags out of a block of text so the chat
//! view can render it as a flow line. Extraction is read-only and advisory;
//! a single tag is not considered a flow.

use colored::Colorize;
use regex::Regex;
use std::sync::OnceLock;

/// Rendering category for a section tag
///
/// Categories exist for display styling only; they carry no data-model
/// identity. Assignment is first-match-wins on substring containment:
/// Chorus/Hook/Drop before Verse before Intro/Outro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionCategory {
    /// High-energy sections: Chorus, Hook, Drop
    Peak,
    /// Narrative sections: Verse
    Verse,
    /// Framing sections: Intro, Outro
    Framing,
    /// Everything else (Bridge, Build, Break, ...)
    Other,
}

/// A recognized section tag extracted from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTag {
    /// Cleaned tag text with brackets stripped and whitespace trimmed
    pub label: String,
    /// Display category
    pub category: SectionCategory,
    /// One-line engineering description of the section's role
    pub tooltip: &'static str,
}

/// Keyword -> description map for section tooltips
///
/// Lookup is by substring containment against the cleaned tag; the first
/// matching key in this order wins.
pub const SECTION_TOOLTIPS: &[(&str, &str)] = &[
    (
        "Intro",
        "Sets the atmosphere. Low energy, establishes the spatial environment.",
    ),
    (
        "Verse",
        "Storytelling section. Focused frequency range, vocals front and center.",
    ),
    (
        "Chorus",
        "The Hook. Maximum stereo width, full frequency spectrum, high energy.",
    ),
    ("Hook", "The earworm. Repetitive, catchy, high impact."),
    (
        "Bridge",
        "Contrast section. Shifts in harmony or rhythm to break monotony.",
    ),
    ("Pre-Chorus", "Ramping energy. Transition tension builder."),
    ("Build", "Rising tension. Increasing frequency density."),
    ("Drop", "Maximum impact. Heavy bass, driving rhythm."),
    (
        "Outro",
        "Decompression. Fading energy to prevent abrupt cuts.",
    ),
    ("Break", "Rhythmic pause. Strips back elements."),
    ("Solo", "Instrumental focus. Vocals recede."),
    ("Instrumental", "No vocals. Focus on beat and texture."),
    ("Transition", "FX heavy section to glue parts together."),
];

/// Fallback description for tags with no tooltip key
const GENERIC_TOOLTIP: &str = "Song structure element";

fn structure_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\[(Intro|Verse|Chorus|Bridge|Outro|Drop|Hook|Pre-Chorus|Build|Break|Interlude|Solo|Instrumental)[^\]]*\]",
        )
        .expect("structure tag regex")
    })
}

/// Extract the ordered section-tag flow from a block of text
///
/// Performs a left-to-right scan returning all non-overlapping recognized
/// tags in order of first occurrence. Returns `None` when fewer than two
/// tags are found, since a single tag is not a flow and the visualization
/// is suppressed.
///
/// # Arguments
///
/// * `text` - Assistant output (or any prose) possibly containing tags
///
/// # Examples
///
/// ```
/// use beatsmith::flow::extract_flow;
///
/// let tags = extract_flow("intro then [Intro] stuff [Chorus] more").unwrap();
/// let labels: Vec<&str> = tags.iter().map(|t| t.label.as_str()).collect();
/// assert_eq!(labels, ["Intro", "Chorus"]);
///
/// assert!(extract_flow("only [Verse 1] here").is_none());
/// ```
pub fn extract_flow(text: &str) -> Option<Vec<SectionTag>> {
    let tags: Vec<SectionTag> = structure_regex()
        .find_iter(text)
        .map(|m| {
            let label = m
                .as_str()
                .trim_matches(|c| c == '[' || c == ']')
                .trim()
                .to_string();
            let category = categorize(&label);
            let tooltip = tooltip_for(&label);
            SectionTag {
                label,
                category,
                tooltip,
            }
        })
        .collect();

    if tags.len() < 2 {
        None
    } else {
        Some(tags)
    }
}

/// Assign a display category to a cleaned tag
///
/// Chorus/Hook/Drop are checked before Verse, before Intro/Outro;
/// the first containment hit wins.
pub fn categorize(label: &str) -> SectionCategory {
    let lower = label.to_lowercase();
    if lower.contains("chorus") || lower.contains("hook") || lower.contains("drop") {
        SectionCategory::Peak
    } else if lower.contains("verse") {
        SectionCategory::Verse
    } else if lower.contains("intro") || lower.contains("outro") {
        SectionCategory::Framing
    } else {
        SectionCategory::Other
    }
}

/// Find the tooltip description for a cleaned tag
///
/// The first key in [`SECTION_TOOLTIPS`] whose text is contained in the tag
/// wins; unmatched tags get a generic fallback.
pub fn tooltip_for(label: &str) -> &'static str {
    SECTION_TOOLTIPS
        .iter()
        .find(|(key, _)| label.contains(key))
        .map(|(_, desc)| *desc)
        .unwrap_or(GENERIC_TOOLTIP)
}

/// Render a flow as a single colored line for the terminal
///
/// Tags are joined with arrows; color follows the section category.
pub fn render_flow(tags: &[SectionTag]) -> String {
    let parts: Vec<String> = tags
        .iter()
        .map(|tag| {
            let painted = match tag.category {
                SectionCategory::Peak => tag.label.green().bold(),
                SectionCategory::Verse => tag.label.blue(),
                SectionCategory::Framing => tag.label.purple(),
                SectionCategory::Other => tag.label.normal().dimmed(),
            };
            format!("[{}]", painted)
        })
        .collect();
    parts.join(" -> ")
}

/// Render a legend for a flow, one line per distinct section role
///
/// The hover affordance of a pointer UI becomes a dimmed block under the
/// flow line; sections sharing a tooltip are listed once.
pub fn render_legend(tags: &[SectionTag]) -> Vec<String> {
    let mut seen: Vec<&'static str> = Vec::new();
    let mut lines = Vec::new();
    for tag in tags {
        if seen.contains(&tag.tooltip) {
            continue;
        }
        seen.push(tag.tooltip);
        lines.push(format!("  {}: {}", tag.label, tag.tooltip));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(text: &str) -> Option<Vec<String>> {
        extract_flow(text).map(|tags| tags.into_iter().map(|t| t.label).collect())
    }

    #[test]
    fn test_extract_flow_two_tags_in_order() {
        assert_eq!(
            labels("intro then [Intro] stuff [Chorus] more"),
            Some(vec!["Intro".to_string(), "Chorus".to_string()])
        );
    }

    #[test]
    fn test_extract_flow_suppressed_for_zero_or_one() {
        assert!(labels("no tags here at all").is_none());
        assert!(labels("just one [Verse 1] tag").is_none());
    }

    #[test]
    fn test_extract_flow_case_insensitive() {
        assert_eq!(
            labels("[intro] then [CHORUS]"),
            Some(vec!["intro".to_string(), "CHORUS".to_string()])
        );
    }

    #[test]
    fn test_extract_flow_trailing_text_kept_in_label() {
        assert_eq!(
            labels("[Verse 1] then [Chorus: high energy]"),
            Some(vec![
                "Verse 1".to_string(),
                "Chorus: high energy".to_string()
            ])
        );
    }

    #[test]
    fn test_extract_flow_ignores_unrecognized_tags() {
        // [Exclude: vocals] is a directive, not a section tag.
        assert_eq!(
            labels("[Exclude: vocals] [Drop] [Build Up 2]"),
            Some(vec!["Drop".to_string(), "Build Up 2".to_string()])
        );
    }

    #[test]
    fn test_extract_flow_left_to_right_occurrence_order() {
        let result = labels("[Outro] text [Intro] text [Drop]").unwrap();
        assert_eq!(result, ["Outro", "Intro", "Drop"]);
    }

    #[test]
    fn test_categorize_first_match_wins() {
        assert_eq!(categorize("Chorus"), SectionCategory::Peak);
        assert_eq!(categorize("Hook"), SectionCategory::Peak);
        assert_eq!(categorize("Drop 2"), SectionCategory::Peak);
        // Pre-Chorus contains "Chorus", checked before Verse and framing.
        assert_eq!(categorize("Pre-Chorus"), SectionCategory::Peak);
        assert_eq!(categorize("Verse 3"), SectionCategory::Verse);
        assert_eq!(categorize("Intro"), SectionCategory::Framing);
        assert_eq!(categorize("Outro"), SectionCategory::Framing);
        assert_eq!(categorize("Bridge"), SectionCategory::Other);
        assert_eq!(categorize("Break"), SectionCategory::Other);
    }

    #[test]
    fn test_tooltip_substring_lookup() {
        assert_eq!(
            tooltip_for("Verse 1"),
            "Storytelling section. Focused frequency range, vocals front and center."
        );
        assert_eq!(
            tooltip_for("Drop 2"),
            "Maximum impact. Heavy bass, driving rhythm."
        );
    }

    #[test]
    fn test_tooltip_first_key_wins() {
        // "Pre-Chorus" contains "Chorus", which appears earlier in the map
        // than the "Pre-Chorus" key itself.
        assert_eq!(
            tooltip_for("Pre-Chorus"),
            "The Hook. Maximum stereo width, full frequency spectrum, high energy."
        );
    }

    #[test]
    fn test_tooltip_fallback() {
        assert_eq!(tooltip_for("Interlude"), "Song structure element");
        assert_eq!(tooltip_for("mystery"), "Song structure element");
    }

    #[test]
    fn test_render_legend_dedupes_by_role() {
        let tags = extract_flow("[Verse 1] a [Chorus] b [Verse 2] c [Outro]").unwrap();
        let legend = render_legend(&tags);
        // Verse 1 and Verse 2 share a role and collapse to one line
        assert_eq!(legend.len(), 3);
        assert!(legend[0].starts_with("  Verse 1:"));
        assert!(legend[1].contains("Maximum stereo width"));
    }

    #[test]
    fn test_render_flow_joins_with_arrows() {
        let tags = extract_flow("[Intro] x [Chorus] y [Outro]").unwrap();
        let line = render_flow(&tags);
        assert_eq!(line.matches("->").count(), 2);
        assert!(line.contains("Intro"));
        assert!(line.contains("Chorus"));
        assert!(line.contains("Outro"));
    }
}
