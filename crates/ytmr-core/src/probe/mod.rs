//! Verification probe: HEAD the resolved stream URL to catch links that
//! the origin already rejects.
//!
//! Uses the curl crate (libcurl). Only an explicit 403 is treated as a
//! rejection; see [`ProbeVerdict`].

mod classify;

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::ProbeConfig;

pub use classify::{classify_error, classify_status, ProbeVerdict};

/// Issues an existence check against a URL.
pub trait UrlProbe {
    /// Performs a HEAD request and returns the final HTTP status code.
    fn head_status(&self, url: &str) -> Result<u32>;
}

/// Runs `probe` against `url` and folds the result into a verdict.
pub fn verify<P: UrlProbe + ?Sized>(probe: &P, url: &str) -> ProbeVerdict {
    match probe.head_status(url) {
        Ok(code) => classify_status(code),
        Err(e) => classify_error(&e),
    }
}

/// libcurl-backed probe with connect and total timeouts.
#[derive(Debug, Clone, Copy)]
pub struct CurlProbe {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for CurlProbe {
    fn default() -> Self {
        Self::from_config(&ProbeConfig::default())
    }
}

impl CurlProbe {
    pub fn from_config(cfg: &ProbeConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }
}

impl UrlProbe for CurlProbe {
    /// Does not follow redirects: the status of `url` itself is reported.
    /// Runs in the current thread.
    fn head_status(&self, url: &str) -> Result<u32> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.nobody(true)?; // HEAD request
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.perform().context("HEAD request failed")?;
        let code = easy.response_code().context("no response code")?;
        Ok(code)
    }
}
