//! Bracket-tag autosuggest matcher for the prompt input line.
//!
//! Suno prompts embed `[...]` delimited directives (exclusions, technical
//! specs, section markers). While the user is typing, this module detects an
//! unterminated `[` at the tail of the input and offers completions from the
//! static recognized tag set.
//!
//! # Examples
//!
//! ```
//! use beatsmith::tags::{match_input, MatchResult};
//!
//! assert_eq!(match_input("build me a beat [ch"), MatchResult::Active("ch".to_string()));
//! assert_eq!(match_input("all closed [Chorus]"), MatchResult::NoMatch);
//! ```

use regex::Regex;
use std::sync::OnceLock;

/// Tags offered by the autosuggest popup.
///
/// Drawn from exclusion directives, technical specs, and a handful of section
/// names. The set is fixed at compile time; suggestion order follows this
/// list.
pub const AUTOSUGGEST_TAGS: &[&str] = &[
    "Preserve original samples",
    "Sample-locked generation",
    "Intro",
    "Verse",
    "Chorus",
    "Bridge",
    "Outro",
    "Drop",
    "Hook",
    "Exclude: melodic elements",
    "Exclude: vocals",
    "Exclude: drums",
    "Exclude: sad chord progressions",
    "Exclude: complex melody",
    "Exclude: digital sheen",
    "Exclude: autotune",
    "Exclude: chaotic arrangement",
    "Exclude: muddiness",
    "Exclude: dissonance",
    "Exclude: busy arrangement",
    "Exclude: harsh frequencies",
    "Exclude: lo-fi artifacts",
    "Exclude: major key",
    "44.1kHz",
    "48kHz",
    "16-bit",
    "24-bit",
];

/// Result of scanning the input line for an in-progress bracket tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// No unterminated `[` at the tail of the input
    NoMatch,
    /// The user is mid-way through a tag; holds the partial query, lowercased
    Active(String),
}

fn tail_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A `]` anywhere in the trailing segment falls outside this character
    // class and therefore invalidates the match.
    RE.get_or_init(|| Regex::new(r"\[([a-zA-Z0-9\s:_-]*)$").expect("tag tail regex"))
}

/// Detect whether the input ends in an unterminated bracket tag
///
/// Scans for a final `[` whose trailing text consists only of letters,
/// digits, whitespace, `:`, `_`, and `-`. Only the last `[` is considered
/// when several are stacked.
///
/// # Arguments
///
/// * `input` - The current contents of the prompt input line
///
/// # Returns
///
/// `MatchResult::Active` with the lowercased partial query, or
/// `MatchResult::NoMatch`.
pub fn match_input(input: &str) -> MatchResult {
    match tail_regex().captures(input) {
        Some(caps) => MatchResult::Active(caps[1].to_lowercase()),
        None => MatchResult::NoMatch,
    }
}

/// Filter the static tag set by a partial query
///
/// Returns every tag whose lowercase text contains `query` as a substring,
/// in the order they appear in [`AUTOSUGGEST_TAGS`]. An empty query returns
/// the full list. No ranking or scoring is applied.
///
/// # Arguments
///
/// * `query` - Partial query, expected lowercase (as produced by [`match_input`])
pub fn suggestions(query: &str) -> Vec<&'static str> {
    AUTOSUGGEST_TAGS
        .iter()
        .copied()
        .filter(|tag| tag.to_lowercase().contains(query))
        .collect()
}

/// Replace the in-progress bracket tag with a chosen completion
///
/// Everything from the last `[` (inclusive) through the end of the input is
/// replaced with `[tag] ` -- tag text, closing bracket, one trailing space.
/// Text before the last `[` is preserved verbatim. When the input contains
/// no `[` at all, it is returned unchanged.
///
/// # Arguments
///
/// * `input` - The current input line
/// * `tag` - The chosen tag text (without brackets)
///
/// # Examples
///
/// ```
/// use beatsmith::tags::insert_tag;
///
/// let out = insert_tag("dark trap [Excl", "Exclude: vocals");
/// assert_eq!(out, "dark trap [Exclude: vocals] ");
/// ```
pub fn insert_tag(input: &str, tag: &str) -> String {
    match input.rfind('[') {
        Some(idx) => format!("{}[{}] ", &input[..idx], tag),
        None => input.to_string(),
    }
}
