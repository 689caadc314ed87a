//! Stream resolver: turn a track id into one playable audio URL.
//!
//! One extractor call, one in-memory selection, and an optional HEAD probe,
//! run sequentially on the caller's thread. The resolver only depends on the
//! [`Extractor`] and [`UrlProbe`] traits; [`StreamResolver::from_config`]
//! wires in yt-dlp and libcurl.

use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

use crate::config::ResolverConfig;
use crate::extract::{Extractor, YtDlp};
use crate::probe::{self, CurlProbe, ProbeVerdict, UrlProbe};
use crate::select::{self, SelectedBy};
use crate::track::TrackId;

/// Why a track could not be resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Extractor failed or reported no representations.
    #[error("no stream data for {track}: {reason}")]
    UpstreamUnavailable { track: String, reason: String },
    /// Nothing with audio and a URL among the reported representations.
    #[error("no suitable stream found for {track}")]
    NoSuitableRepresentation { track: String },
    /// Verification probe got HTTP 403 for the selected URL.
    #[error("stream URL forbidden for {track}")]
    Forbidden { track: String },
    #[error("unexpected failure resolving {track}: {reason}")]
    Unexpected { track: String, reason: String },
}

impl ResolveError {
    /// Track (or raw input) the failure belongs to.
    pub fn track(&self) -> &str {
        match self {
            ResolveError::UpstreamUnavailable { track, .. }
            | ResolveError::NoSuitableRepresentation { track }
            | ResolveError::Forbidden { track }
            | ResolveError::Unexpected { track, .. } => track,
        }
    }
}

/// A successfully resolved stream plus what led to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStream {
    pub track: TrackId,
    pub url: String,
    pub format_id: Option<String>,
    pub quality: String,
    /// Approximate bitrate in kbps (`abr`, else `tbr`, else 0).
    pub bitrate_kbps: f64,
    pub selected_by: SelectedBy,
    /// Probe verdict; `None` when verification is disabled.
    pub verification: Option<ProbeVerdict>,
}

pub struct StreamResolver<E = YtDlp, P = CurlProbe> {
    extractor: E,
    probe: P,
    stream_preference: Vec<String>,
    verify_track_url: bool,
}

impl StreamResolver {
    /// yt-dlp extractor and curl probe configured from `cfg`.
    pub fn from_config(cfg: &ResolverConfig) -> Self {
        Self::new(
            YtDlp::from_config(&cfg.extractor),
            CurlProbe::from_config(&cfg.probe),
            cfg,
        )
    }
}

impl<E: Extractor, P: UrlProbe> StreamResolver<E, P> {
    pub fn new(extractor: E, probe: P, cfg: &ResolverConfig) -> Self {
        Self {
            extractor,
            probe,
            stream_preference: cfg.stream_preference.clone(),
            verify_track_url: cfg.verify_track_url,
        }
    }

    /// Replaces the configured preference list.
    pub fn with_preferences(mut self, stream_preference: Vec<String>) -> Self {
        self.stream_preference = stream_preference;
        self
    }

    pub fn with_verification(mut self, verify_track_url: bool) -> Self {
        self.verify_track_url = verify_track_url;
        self
    }

    pub fn stream_preference(&self) -> &[String] {
        &self.stream_preference
    }

    pub fn verifies_track_url(&self) -> bool {
        self.verify_track_url
    }

    /// Resolves `input` (bare id or `ytmusic:track:` URI) to a stream URL.
    ///
    /// Never fails or panics past this point: every error is logged and
    /// turned into `None`.
    pub fn resolve_url(&self, input: &str) -> Option<String> {
        self.try_resolve(input).ok().map(|stream| stream.url)
    }

    /// Like [`resolve_url`](Self::resolve_url) but keeps the details.
    ///
    /// Errors are logged before being returned, and a panic inside a
    /// collaborator is reported as [`ResolveError::Unexpected`].
    pub fn try_resolve(&self, input: &str) -> Result<ResolvedStream, ResolveError> {
        tracing::debug!("resolve \"{}\"", input);
        let result = TrackId::parse(input)
            .map_err(|e| ResolveError::Unexpected {
                track: input.to_string(),
                reason: format!("{e:#}"),
            })
            .and_then(|track| {
                panic::catch_unwind(AssertUnwindSafe(|| self.resolve(&track))).unwrap_or_else(
                    |payload| {
                        Err(ResolveError::Unexpected {
                            track: track.to_string(),
                            reason: panic_message(payload.as_ref()),
                        })
                    },
                )
            });
        if let Err(e) = &result {
            tracing::error!("{}", e);
        }
        result
    }

    /// Runs extraction, selection and (optionally) verification for `track`.
    pub fn resolve(&self, track: &TrackId) -> Result<ResolvedStream, ResolveError> {
        let lookup_url = track
            .lookup_url()
            .map_err(|e| ResolveError::Unexpected {
                track: track.to_string(),
                reason: format!("{e:#}"),
            })?;

        let formats = self
            .extractor
            .extract(&lookup_url)
            .map_err(|e| ResolveError::UpstreamUnavailable {
                track: track.to_string(),
                reason: format!("{e:#}"),
            })?;
        if formats.is_empty() {
            return Err(ResolveError::UpstreamUnavailable {
                track: track.to_string(),
                reason: "no formats reported".to_string(),
            });
        }
        tracing::debug!("{} formats reported for {}", formats.len(), track);

        let no_suitable = || ResolveError::NoSuitableRepresentation {
            track: track.to_string(),
        };
        let selection = select::select(&formats, &self.stream_preference).ok_or_else(no_suitable)?;
        let chosen = selection.representation;
        let url = chosen
            .url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(no_suitable)?;

        tracing::info!(
            "found {} stream with {:.0} kbps for {} (format {}, {:?})",
            chosen.quality(),
            chosen.display_bitrate(),
            track,
            chosen.format_id.as_deref().unwrap_or("?"),
            selection.selected_by
        );

        let verification = if self.verify_track_url {
            Some(self.verify(track, &url)?)
        } else {
            None
        };

        Ok(ResolvedStream {
            track: track.clone(),
            url,
            format_id: chosen.format_id.clone(),
            quality: chosen.quality().to_string(),
            bitrate_kbps: chosen.display_bitrate(),
            selected_by: selection.selected_by,
            verification,
        })
    }

    /// Only a 403 rejects the URL; anything else is logged and let through.
    fn verify(&self, track: &TrackId, url: &str) -> Result<ProbeVerdict, ResolveError> {
        let verdict = probe::verify(&self.probe, url);
        match &verdict {
            ProbeVerdict::Forbidden => {
                return Err(ResolveError::Forbidden {
                    track: track.to_string(),
                })
            }
            ProbeVerdict::Reachable(code) => {
                tracing::debug!("verified stream URL for {} (HTTP {})", track, code);
            }
            ProbeVerdict::Inconclusive(reason) => {
                tracing::warn!("failed to verify stream URL for {}: {}", track, reason);
            }
        }
        Ok(verdict)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic".to_string()
    }
}
