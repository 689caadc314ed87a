//! Track identifiers and the canonical lookup URL built from them.

use anyhow::{bail, Context, Result};
use std::fmt;

/// Prefix of track URIs handed out by the music library side.
const TRACK_URI_PREFIX: &str = "ytmusic:track:";

/// Watch page the extractor is pointed at; the id goes in the `v` query parameter.
const WATCH_URL: &str = "https://music.youtube.com/watch";

/// Opaque, non-empty identifier of a track in the YouTube Music catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(String);

impl TrackId {
    /// Wraps a bare id. Surrounding whitespace is trimmed; empty ids and ids
    /// with inner whitespace are rejected.
    pub fn new(id: &str) -> Result<Self> {
        let id = id.trim();
        if id.is_empty() {
            bail!("empty track id");
        }
        if id.contains(char::is_whitespace) {
            bail!("track id contains whitespace: {id:?}");
        }
        Ok(Self(id.to_string()))
    }

    /// Extracts the id from a `ytmusic:track:<id>` URI.
    ///
    /// Anything after a further `:` is ignored. Returns `None` for URIs that
    /// do not name a track.
    pub fn from_uri(uri: &str) -> Option<Self> {
        let rest = uri.trim().strip_prefix(TRACK_URI_PREFIX)?;
        let id = rest.split(':').next()?;
        Self::new(id).ok()
    }

    /// Accepts either a bare id or a track URI.
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim_start().starts_with("ytmusic:") {
            return Self::from_uri(input).with_context(|| format!("not a track URI: {input}"));
        }
        Self::new(input)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical lookup URL, e.g. `https://music.youtube.com/watch?v=abc123`.
    pub fn lookup_url(&self) -> Result<String> {
        let url = url::Url::parse_with_params(WATCH_URL, &[("v", self.0.as_str())])
            .with_context(|| format!("build lookup URL for {}", self.0))?;
        Ok(url.into())
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_id_is_trimmed() {
        let id = TrackId::new("  abc123 ").unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn empty_or_spaced_ids_rejected() {
        assert!(TrackId::new("").is_err());
        assert!(TrackId::new("   ").is_err());
        assert!(TrackId::new("abc 123").is_err());
    }

    #[test]
    fn track_uri_yields_third_field() {
        let id = TrackId::from_uri("ytmusic:track:dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");

        let id = TrackId::from_uri("ytmusic:track:dQw4w9WgXcQ:extra").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn non_track_uris_rejected() {
        assert!(TrackId::from_uri("ytmusic:album:xyz").is_none());
        assert!(TrackId::from_uri("ytmusic:track:").is_none());
        assert!(TrackId::from_uri("spotify:track:abc").is_none());
        assert!(TrackId::parse("ytmusic:playlist:abc").is_err());
    }

    #[test]
    fn uri_and_bare_id_share_lookup_url() {
        let a = TrackId::parse("ytmusic:track:abc123").unwrap();
        let b = TrackId::parse("abc123").unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.lookup_url().unwrap(),
            "https://music.youtube.com/watch?v=abc123"
        );
    }

    #[test]
    fn lookup_url_escapes_id() {
        let id = TrackId::new("a&b=c").unwrap();
        assert_eq!(
            id.lookup_url().unwrap(),
            "https://music.youtube.com/watch?v=a%26b%3Dc"
        );
    }
}
