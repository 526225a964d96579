//! Audio analysis command
//!
//! Runs the technical audit flow: load the file, probe its duration, send
//! it to the provider, and fall back to a deterministic record when the
//! audit fails.

use crate::audio::AudioUpload;
use crate::error::Result;
use crate::providers::{AssistantProvider, AudioAnalysis, AudioDescribeRequest};
use crate::template::suggest_template;
use colored::Colorize;

/// Load a file and run the provider audit, absorbing audit failures
///
/// A provider or parse failure yields the deterministic fallback record
/// rather than an error; only an unreadable file fails.
///
/// # Errors
///
/// Returns `BeatsmithError::Audio` if the file cannot be read
pub async fn analyze_file(
    provider: &dyn AssistantProvider,
    path: &str,
    description: &str,
) -> Result<AudioAnalysis> {
    let upload = AudioUpload::from_path(path)?;

    let request = AudioDescribeRequest {
        filename: upload.filename.clone(),
        duration_secs: upload.duration_secs,
        audio_base64: Some(upload.data_b64),
        mime_type: upload.mime_type,
        description: description.to_string(),
    };

    match provider.describe_audio(&request).await {
        Ok(analysis) => Ok(analysis),
        Err(e) => {
            tracing::warn!("Audio audit failed, using fallback: {}", e);
            Ok(AudioAnalysis::fallback(
                &upload.filename,
                upload.duration_secs,
            ))
        }
    }
}

/// Print an analysis record
pub fn print_analysis(analysis: &AudioAnalysis) {
    println!("\n{}", "AUDIO AUDIT".bold());
    println!("  File:       {}", analysis.filename);
    println!("  Duration:   {}", analysis.duration);
    println!("  Rate:       {}", analysis.sample_rate);
    println!("  BPM:        {}", analysis.detected_bpm.cyan());
    println!("  Key:        {}", analysis.detected_key.cyan());
    println!("  Balance:    {}", analysis.spectral_balance);
    println!("  Transients: {}", analysis.transient_density);
    println!("  Stereo:     {}", analysis.stereo_image);
    println!("\n  Suggestions:");
    for suggestion in &analysis.suggestions {
        println!("    - {}", suggestion);
    }
    if let Some(template_id) = suggest_template(&analysis.transient_density) {
        println!(
            "\n  Try the {} structure template for this one.",
            template_id.cyan()
        );
    }
    println!();
}

/// Handle the one-shot `analyze` command
///
/// # Errors
///
/// Returns error if the file cannot be read
pub async fn handle_analyze(
    provider: &dyn AssistantProvider,
    file: &str,
    description: &str,
) -> Result<()> {
    let analysis = analyze_file(provider, file, description).await?;
    print_analysis(&analysis);
    Ok(())
}
