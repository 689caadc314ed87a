//! Subset of the extractor's info JSON needed for stream selection.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Codec value the extractor reports for an absent audio or video track.
const NO_CODEC: &str = "none";

/// Top-level info document (`yt-dlp -J`). Only `formats` is consumed.
#[derive(Debug, Deserialize)]
struct InfoJson {
    #[serde(default)]
    formats: Option<Vec<Representation>>,
}

/// One encoded version of a track with its own retrievable URL.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Representation {
    /// Format identifier (YouTube itag), used as the preference key.
    #[serde(default)]
    pub format_id: Option<String>,
    /// Audio codec; `"none"` means no audio track.
    #[serde(default)]
    pub acodec: Option<String>,
    /// Video codec; `"none"` means audio-only.
    #[serde(default)]
    pub vcodec: Option<String>,
    /// Approximate audio bitrate in kbps.
    #[serde(default)]
    pub abr: Option<f64>,
    /// Approximate total bitrate in kbps.
    #[serde(default)]
    pub tbr: Option<f64>,
    /// Human-readable quality label (e.g. "medium").
    #[serde(default)]
    pub format_note: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Representation {
    /// True unless the extractor explicitly reported no audio codec.
    pub fn has_audio(&self) -> bool {
        self.acodec.as_deref() != Some(NO_CODEC)
    }

    /// Audio present and the video codec is explicitly `"none"`.
    pub fn is_audio_only(&self) -> bool {
        self.has_audio() && self.vcodec.as_deref() == Some(NO_CODEC)
    }

    /// Audio bitrate used for ranking; missing counts as zero.
    pub fn audio_bitrate(&self) -> f64 {
        self.abr.unwrap_or(0.0)
    }

    /// Best-effort bitrate for diagnostics: `abr`, else `tbr`, else zero.
    pub fn display_bitrate(&self) -> f64 {
        self.abr
            .filter(|b| *b > 0.0)
            .or(self.tbr)
            .unwrap_or(0.0)
    }

    /// Quality label for diagnostics.
    pub fn quality(&self) -> &str {
        self.format_note.as_deref().unwrap_or("unknown")
    }
}

/// Parses extractor stdout into the list of representations.
///
/// A document without a `formats` array yields an empty list.
pub fn parse_formats(stdout: &[u8]) -> Result<Vec<Representation>> {
    let info: InfoJson = serde_json::from_slice(stdout).context("parse extractor JSON")?;
    Ok(info.formats.unwrap_or_default())
}
