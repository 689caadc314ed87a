//! CLI for the ytmr stream resolver.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use ytmr_core::config;

use commands::{run_config, run_formats, run_resolve, ResolveOverrides};

/// Top-level CLI for ytmr.
#[derive(Debug, Parser)]
#[command(name = "ytmr")]
#[command(about = "ytmr: resolve YouTube Music tracks to playable audio stream URLs", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/ytmr/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a track to a stream URL and print it.
    Resolve {
        /// Track id or `ytmusic:track:<id>` URI.
        track: String,

        /// Comma-separated format ids overriding `stream_preference`. An empty value clears it.
        #[arg(long, value_delimiter = ',', value_name = "IDS")]
        prefer: Option<Vec<String>>,

        /// HEAD the resolved URL and fail on 403.
        #[arg(long, conflicts_with = "no_verify")]
        verify: bool,

        /// Skip verification even if the config enables it.
        #[arg(long)]
        no_verify: bool,

        /// Give up if nothing is resolved within N seconds.
        #[arg(long, value_name = "N")]
        deadline_secs: Option<u64>,
    },

    /// List the formats the extractor reports for a track.
    Formats {
        /// Track id or `ytmusic:track:<id>` URI.
        track: String,
    },

    /// Show the config file location and effective settings.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let (cfg_path, cfg) = match &cli.config_file {
            Some(path) => (path.clone(), config::load_from(path)?),
            None => (config::config_path()?, config::load_or_init()?),
        };
        tracing::debug!("loaded config from {}: {:?}", cfg_path.display(), cfg);

        match cli.command {
            CliCommand::Resolve {
                track,
                prefer,
                verify,
                no_verify,
                deadline_secs,
            } => {
                let overrides = ResolveOverrides::from_flags(prefer, verify, no_verify);
                run_resolve(
                    &cfg,
                    overrides,
                    &track,
                    deadline_secs.map(Duration::from_secs),
                )
                .await?;
            }
            CliCommand::Formats { track } => run_formats(&cfg, &track).await?,
            CliCommand::Config => run_config(&cfg_path, &cfg).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
