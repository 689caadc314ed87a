//! `ytmr config` – show where the config lives and what is in effect.

use anyhow::Result;
use std::path::Path;
use ytmr_core::config::ResolverConfig;
use ytmr_core::extract::YtDlp;

pub async fn run_config(path: &Path, cfg: &ResolverConfig) -> Result<()> {
    let extractor = YtDlp::from_config(&cfg.extractor);
    let version = tokio::task::spawn_blocking(move || extractor.version())
        .await?
        .unwrap_or_else(|e| format!("unavailable ({e:#})"));

    let prefs = if cfg.stream_preference.is_empty() {
        "(none: best audio-only)".to_string()
    } else {
        cfg.stream_preference.join(", ")
    };
    println!("Config file:       {}", path.display());
    println!("Stream preference: {prefs}");
    println!("Verify track URL:  {}", cfg.verify_track_url);
    println!(
        "Extractor:         {} [{version}]",
        cfg.extractor.program.display()
    );
    if let Some(cookies) = &cfg.extractor.cookies {
        println!("Cookies:           {}", cookies.display());
    }
    println!(
        "Probe timeouts:    {}s total, {}s connect",
        cfg.probe.timeout_secs, cfg.probe.connect_timeout_secs
    );
    Ok(())
}
