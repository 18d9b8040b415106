use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};

/// Line-offset rules for the hoster and redirect scans.
///
/// The accepted offsets mirror the markup of the episode pages: the
/// `data-lang-key` attribute sits a fixed number of lines away from the
/// hoster icon and redirect anchor. The values here are data, not code, so
/// they can be retuned from a config file when the site layout drifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOffsets {
    /// Lines to look back from a hoster icon for the language key.
    pub hoster_lang_lookback: Vec<usize>,
    /// Lines to look ahead from a redirect anchor for the hoster name.
    pub redirect_hoster_lookahead: usize,
    /// Lines to look back from a redirect anchor for the language key.
    pub redirect_lang_lookback: usize,
}

impl Default for ScanOffsets {
    fn default() -> Self {
        Self {
            hoster_lang_lookback: vec![3, 6],
            redirect_hoster_lookahead: 2,
            redirect_lang_lookback: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one file per cached page.
    pub cache_dir: PathBuf,
    /// Site root prepended to relative links found in pages.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Upper bound for the episode/season probe loops.
    pub max_probe: u32,
    pub offsets: ScanOffsets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("scrapes"),
            base_url: "https://aniworld.to".to_string(),
            user_agent: format!("aniscrape/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            max_probe: 10_000,
            offsets: ScanOffsets::default(),
        }
    }
}

impl Config {
    /// Loads the config from a TOML file, falling back to defaults when no
    /// path is given or the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|source| ScrapeError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
