//! Audio intake for the analyze flow
//!
//! Reads an audio file from disk, base64-encodes it for the provider, and
//! probes WAV headers locally for a duration estimate. Probe failures are
//! absorbed: an unreadable or non-WAV header yields a duration of zero and
//! the analysis proceeds without it.

use crate::error::{BeatsmithError, Result};
use base64::Engine;
use std::path::Path;

/// An audio file prepared for upload to the provider
#[derive(Debug, Clone)]
pub struct AudioUpload {
    /// Original filename (no directory components)
    pub filename: String,
    /// Base64-encoded file bytes
    pub data_b64: String,
    /// MIME type inferred from the file extension
    pub mime_type: String,
    /// Duration in seconds from the local WAV probe; zero when unknown
    pub duration_secs: f64,
}

impl AudioUpload {
    /// Load an audio file from disk
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the audio file
    ///
    /// # Errors
    ///
    /// Returns `BeatsmithError::Audio` if the file cannot be read. A failed
    /// duration probe is not an error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| BeatsmithError::Audio(format!("Failed to read {}: {}", path.display(), e)))?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let duration_secs = match wav_duration_secs(&bytes) {
            Some(d) => d,
            None => {
                tracing::warn!("Could not probe duration for {}", filename);
                0.0
            }
        };

        Ok(Self {
            mime_type: mime_for_path(path).to_string(),
            data_b64: base64::engine::general_purpose::STANDARD.encode(&bytes),
            filename,
            duration_secs,
        })
    }
}

/// Infer a MIME type from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("m4a") | Some("aac") => "audio/aac",
        _ => "application/octet-stream",
    }
}

/// Probe a WAV (RIFF) header for the track duration
///
/// Walks the chunk list for `fmt ` (byte rate) and `data` (payload size);
/// duration is payload size over byte rate. Returns None for anything that
/// is not a well-formed WAV.
pub fn wav_duration_secs(bytes: &[u8]) -> Option<f64> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return None;
    }

    let mut byte_rate: Option<u32> = None;
    let mut data_size: Option<u32> = None;

    let mut offset = 12usize;
    while offset + 8 <= bytes.len() {
        let chunk_id = &bytes[offset..offset + 4];
        let chunk_size = u32::from_le_bytes(bytes[offset + 4..offset + 8].try_into().ok()?);

        match chunk_id {
            b"fmt " => {
                // Byte rate sits 8 bytes into the fmt chunk
                if offset + 8 + 12 <= bytes.len() {
                    byte_rate = Some(u32::from_le_bytes(
                        bytes[offset + 16..offset + 20].try_into().ok()?,
                    ));
                }
            }
            b"data" => {
                data_size = Some(chunk_size);
            }
            _ => {}
        }

        // Chunks are word-aligned
        offset = offset
            .checked_add(8)?
            .checked_add(chunk_size as usize)?
            .checked_add((chunk_size % 2) as usize)?;
    }

    match (byte_rate, data_size) {
        (Some(rate), Some(size)) if rate > 0 => Some(f64::from(size) / f64::from(rate)),
        _ => None,
    }
}
