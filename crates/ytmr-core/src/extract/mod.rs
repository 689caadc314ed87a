//! Metadata extraction: turn a lookup URL into the list of available
//! stream representations.
//!
//! The resolver only depends on the [`Extractor`] trait; [`YtDlp`] is the
//! production backend.

mod parse;
mod ytdlp;

pub use parse::{parse_formats, Representation};
pub use ytdlp::YtDlp;

/// Source of stream representations for a lookup URL.
pub trait Extractor {
    /// Returns every representation the service reports, in source order.
    fn extract(&self, lookup_url: &str) -> anyhow::Result<Vec<Representation>>;
}
