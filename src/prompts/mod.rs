//! System prompt and outgoing-prompt composition
//!
//! This module carries the D-Hz persona system prompt and assembles the
//! final prompt text sent to the provider: technical-spec prefix, optional
//! audio-analysis context, and the beef-up framing when that mode is active.

pub mod persona;

use crate::chat_mode::AppMode;
use crate::providers::AudioAnalysis;

pub use persona::SYSTEM_PROMPT;

/// Build the `[Technical Specs: ...]` prefix from the active fidelity settings
///
/// # Examples
///
/// ```
/// use beatsmith::prompts::technical_specs_prefix;
///
/// let prefix = technical_specs_prefix("44.1kHz", "16-bit");
/// assert_eq!(prefix, "[Technical Specs: 44.1kHz, 16-bit]");
/// ```
pub fn technical_specs_prefix(sample_rate: &str, bit_depth: &str) -> String {
    format!("[Technical Specs: {}, {}]", sample_rate, bit_depth)
}

/// Build the audio-analysis context preamble injected ahead of the prompt
pub fn analysis_context(analysis: &AudioAnalysis) -> String {
    format!(
        "[AUDIO ANALYSIS CONTEXT: BPM={}, Key={}, Balance={}]",
        analysis.detected_bpm, analysis.detected_key, analysis.spectral_balance
    )
}

/// Beef-up framing wrapped around outgoing prompts in that mode
const BEEF_UP_CONTEXT: &str = "[CONTEXT: The user wants to \"Beef Up\" an uploaded sample. \
Treat the input as a description of the latent seed audio. Apply the signal chain protocol. \
Use granular exclusions if necessary.]";

/// Compose the final outgoing prompt from the raw input line
///
/// The technical-specs prefix is always present; the analysis context is
/// prepended when a scan is loaded; the beef-up framing wraps everything
/// in [`AppMode::BeefUp`].
///
/// # Arguments
///
/// * `input` - The raw user input line
/// * `sample_rate` - Active sample rate setting
/// * `bit_depth` - Active bit depth setting
/// * `analysis` - Currently loaded audio analysis, if any
/// * `mode` - Active application mode
pub fn compose_prompt(
    input: &str,
    sample_rate: &str,
    bit_depth: &str,
    analysis: Option<&AudioAnalysis>,
    mode: AppMode,
) -> String {
    let mut prompt = format!(
        "{} {}",
        technical_specs_prefix(sample_rate, bit_depth),
        input
    );

    if let Some(analysis) = analysis {
        prompt = format!("{} {}", analysis_context(analysis), prompt);
    }

    if mode == AppMode::BeefUp {
        prompt = format!("{} {}", BEEF_UP_CONTEXT, prompt);
    }

    prompt
}
