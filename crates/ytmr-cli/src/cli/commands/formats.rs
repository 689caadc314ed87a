//! `ytmr formats <track>` – show what the extractor reports and what would be picked.

use anyhow::{Context, Result};
use ytmr_core::config::ResolverConfig;
use ytmr_core::extract::{Extractor, Representation, YtDlp};
use ytmr_core::select;
use ytmr_core::TrackId;

fn print_formats(formats: &[Representation]) {
    println!(
        "{:<8} {:<14} {:<14} {:>8}  {}",
        "FORMAT", "ACODEC", "VCODEC", "KBPS", "NOTE"
    );
    for f in formats {
        println!(
            "{:<8} {:<14} {:<14} {:>8.0}  {}",
            f.format_id.as_deref().unwrap_or("-"),
            f.acodec.as_deref().unwrap_or("?"),
            f.vcodec.as_deref().unwrap_or("?"),
            f.display_bitrate(),
            f.quality()
        );
    }
}

pub async fn run_formats(cfg: &ResolverConfig, track: &str) -> Result<()> {
    let track = TrackId::parse(track)?;
    let lookup_url = track.lookup_url()?;
    let extractor = YtDlp::from_config(&cfg.extractor);
    let formats = tokio::task::spawn_blocking(move || extractor.extract(&lookup_url))
        .await
        .context("extract task join")??;

    if formats.is_empty() {
        println!("No formats reported for {track}.");
        return Ok(());
    }
    print_formats(&formats);
    match select::select(&formats, &cfg.stream_preference) {
        Some(s) => println!(
            "Selected: {} ({:?})",
            s.representation.format_id.as_deref().unwrap_or("-"),
            s.selected_by
        ),
        None => println!("Selected: none (no format carries audio)"),
    }
    Ok(())
}
