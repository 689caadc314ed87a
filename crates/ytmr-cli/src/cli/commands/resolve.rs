//! `ytmr resolve <track>` – print the playable stream URL.

use anyhow::{bail, Context, Result};
use std::time::Duration;
use ytmr_core::config::ResolverConfig;
use ytmr_core::extract::Extractor;
use ytmr_core::probe::UrlProbe;
use ytmr_core::StreamResolver;

/// Per-invocation flags layered over the loaded config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOverrides {
    /// Replaces `stream_preference`; an empty list clears it.
    pub prefer: Option<Vec<String>>,
    /// Forces `verify_track_url` on or off.
    pub verify: Option<bool>,
}

impl ResolveOverrides {
    pub fn from_flags(prefer: Option<Vec<String>>, verify: bool, no_verify: bool) -> Self {
        let prefer = prefer.map(|ids| {
            ids.into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });
        let verify = match (verify, no_verify) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Self { prefer, verify }
    }

    pub fn apply<E: Extractor, P: UrlProbe>(
        self,
        mut resolver: StreamResolver<E, P>,
    ) -> StreamResolver<E, P> {
        if let Some(ids) = self.prefer {
            resolver = resolver.with_preferences(ids);
        }
        if let Some(verify) = self.verify {
            resolver = resolver.with_verification(verify);
        }
        resolver
    }
}

/// Runs the blocking resolver off the async runtime. With a deadline, a late
/// result is discarded and the command fails.
pub async fn run_resolve(
    cfg: &ResolverConfig,
    overrides: ResolveOverrides,
    track: &str,
    deadline: Option<Duration>,
) -> Result<()> {
    let resolver = overrides.apply(StreamResolver::from_config(cfg));
    let task = tokio::task::spawn_blocking({
        let track = track.to_string();
        move || resolver.try_resolve(&track)
    });
    let result = match deadline {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined.context("resolve task join")?,
            Err(_) => bail!("no stream resolved for {} within {}s", track, limit.as_secs()),
        },
        None => task.await.context("resolve task join")?,
    };

    let stream = result?;
    tracing::info!(
        "resolved {} to format {} ({:.0} kbps)",
        stream.track,
        stream.format_id.as_deref().unwrap_or("?"),
        stream.bitrate_kbps
    );
    println!("{}", stream.url);
    Ok(())
}
