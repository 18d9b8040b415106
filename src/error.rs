use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the scraping library.
///
/// Heuristic misses are not errors: extractors return `None` or an empty
/// collection when a page does not match their pattern. The one exception is
/// the cover image, which every series page is expected to carry, so its
/// absence is `CoverNotFound`.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cover image not found on {url}")]
    CoverNotFound { url: String },

    #[error("not a supported aniworld.to url: {0}")]
    UnsupportedUrl(String),

    #[error("invalid config file {}: {}", .path.display(), .source)]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
