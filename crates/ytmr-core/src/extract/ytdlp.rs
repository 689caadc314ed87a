//! `yt-dlp` subprocess backend.
//!
//! Runs `yt-dlp -J` against the lookup URL and reads the info JSON from
//! stdout. yt-dlp handles signature and throttling-parameter decoding, so the
//! URLs it reports are directly playable. Blocks the current thread; call
//! from `spawn_blocking` if used from async code.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::Command;

use crate::config::ExtractorConfig;

use super::parse::{parse_formats, Representation};
use super::Extractor;

#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    cookies: Option<PathBuf>,
    extra_args: Vec<String>,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            cookies: None,
            extra_args: Vec::new(),
        }
    }

    pub fn from_config(cfg: &ExtractorConfig) -> Self {
        Self {
            program: cfg.program.clone(),
            cookies: cfg.cookies.clone(),
            extra_args: cfg.extra_args.clone(),
        }
    }

    fn command(&self, lookup_url: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-J", "--no-warnings", "--no-playlist"]);
        if let Some(cookies) = &self.cookies {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.args(&self.extra_args);
        cmd.arg(lookup_url);
        cmd
    }

    /// Reports the extractor version (`yt-dlp --version`).
    pub fn version(&self) -> Result<String> {
        let out = Command::new(&self.program)
            .arg("--version")
            .output()
            .with_context(|| format!("run {}", self.program.display()))?;
        if !out.status.success() {
            bail!("{} --version exited with {}", self.program.display(), out.status);
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }
}

impl Extractor for YtDlp {
    fn extract(&self, lookup_url: &str) -> Result<Vec<Representation>> {
        tracing::debug!("running {} for {}", self.program.display(), lookup_url);
        let out = self
            .command(lookup_url)
            .output()
            .with_context(|| format!("run {}", self.program.display()))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            bail!(
                "{} exited with {}: {}",
                self.program.display(),
                out.status,
                stderr.trim()
            );
        }
        parse_formats(&out.stdout)
    }
}
