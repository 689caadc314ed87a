use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How the extractor subprocess is invoked (optional `[extractor]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Executable name or path of yt-dlp.
    pub program: PathBuf,
    /// Netscape-format cookie file passed to the extractor, if any.
    pub cookies: Option<PathBuf>,
    /// Extra arguments inserted before the lookup URL.
    pub extra_args: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("yt-dlp"),
            cookies: None,
            extra_args: Vec::new(),
        }
    }
}

/// Verification probe timeouts (optional `[probe]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Upper bound for the whole HEAD request, in seconds.
    pub timeout_secs: u64,
    /// Upper bound for DNS + TCP/TLS connect, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            connect_timeout_secs: 3,
        }
    }
}

/// Resolver configuration loaded from `~/.config/ytmr/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Format ids (itags) in priority order. Absent or empty means "pick the
    /// best audio-only stream".
    ///
    /// The file written by [`load_or_init`] seeds `["141", "251", "140", "250", "249"]`;
    /// a hand-written file that omits the key gets an empty list instead.
    #[serde(default, deserialize_with = "deserialize_format_ids")]
    pub stream_preference: Vec<String>,
    /// HEAD the resolved URL and drop it when the origin answers 403.
    #[serde(default)]
    pub verify_track_url: bool,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            // m4a 256k, opus 160k, m4a 128k, opus 70k, opus 50k
            stream_preference: ["141", "251", "140", "250", "249"]
                .into_iter()
                .map(String::from)
                .collect(),
            verify_track_url: false,
            extractor: ExtractorConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

/// Format ids may be written as TOML integers or strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormatId {
    Text(String),
    Number(i64),
}

fn deserialize_format_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids: Vec<FormatId> = Vec::deserialize(deserializer)?;
    Ok(ids
        .into_iter()
        .map(|id| match id {
            FormatId::Text(s) => s.trim().to_string(),
            FormatId::Number(n) => n.to_string(),
        })
        .filter(|s| !s.is_empty())
        .collect())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ytmr")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ResolverConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ResolverConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<ResolverConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ResolverConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_values() {
        let cfg = ResolverConfig::default();
        assert_eq!(cfg.stream_preference, ["141", "251", "140", "250", "249"]);
        assert!(!cfg.verify_track_url);
        assert_eq!(cfg.extractor.program, PathBuf::from("yt-dlp"));
        assert_eq!(cfg.probe.timeout_secs, 5);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ResolverConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ResolverConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn empty_file_means_no_preferences() {
        let cfg: ResolverConfig = toml::from_str("").unwrap();
        assert!(cfg.stream_preference.is_empty());
        assert!(!cfg.verify_track_url);
        assert_eq!(cfg.extractor, ExtractorConfig::default());
        assert_eq!(cfg.probe, ProbeConfig::default());
    }

    #[test]
    fn integer_and_string_format_ids() {
        let toml = r#"
            stream_preference = [251, "140", " 18 "]
            verify_track_url = true
        "#;
        let cfg: ResolverConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.stream_preference, ["251", "140", "18"]);
        assert!(cfg.verify_track_url);
    }

    #[test]
    fn extractor_and_probe_sections() {
        let toml = r#"
            stream_preference = []

            [extractor]
            program = "/usr/local/bin/yt-dlp"
            cookies = "/home/me/cookies.txt"
            extra_args = ["--force-ipv4"]

            [probe]
            timeout_secs = 2
        "#;
        let cfg: ResolverConfig = toml::from_str(toml).unwrap();
        assert!(cfg.stream_preference.is_empty());
        assert_eq!(cfg.extractor.program, PathBuf::from("/usr/local/bin/yt-dlp"));
        assert_eq!(
            cfg.extractor.cookies.as_deref(),
            Some(Path::new("/home/me/cookies.txt"))
        );
        assert_eq!(cfg.extractor.extra_args, ["--force-ipv4"]);
        assert_eq!(cfg.probe.timeout_secs, 2);
        assert_eq!(cfg.probe.connect_timeout_secs, 3);
    }

    #[test]
    fn load_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"stream_preference = [140]\n").unwrap();
        f.flush().unwrap();
        let cfg = load_from(f.path()).unwrap();
        assert_eq!(cfg.stream_preference, ["140"]);
    }

    #[test]
    fn generated_file_keeps_seeded_preferences() {
        let mut f = NamedTempFile::new().unwrap();
        let generated = toml::to_string_pretty(&ResolverConfig::default()).unwrap();
        f.write_all(generated.as_bytes()).unwrap();
        f.flush().unwrap();
        let cfg = load_from(f.path()).unwrap();
        assert_eq!(cfg.stream_preference, ["141", "251", "140", "250", "249"]);

        let mut bare = NamedTempFile::new().unwrap();
        bare.write_all(b"verify_track_url = true\n").unwrap();
        bare.flush().unwrap();
        assert!(load_from(bare.path()).unwrap().stream_preference.is_empty());
    }

    #[test]
    fn load_from_invalid_file_is_error() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"stream_preference = 251\n").unwrap();
        f.flush().unwrap();
        assert!(load_from(f.path()).is_err());
    }
}
