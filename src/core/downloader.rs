use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::error::Result;

/// File name the cover image is stored under in the output directory.
pub const COVER_FILENAME: &str = "cover.png";

/// Downloads the series cover image.
///
/// Unlike page fetches this never goes through the cache: the image is
/// re-downloaded on every call and written to a fixed file name in the
/// destination directory.
pub struct CoverDownloader {
    client: reqwest::blocking::Client,
}

impl CoverDownloader {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    /// Fetches `image_url` and writes the raw bytes to
    /// `<dest_dir>/cover.png`, returning the source URL used.
    pub fn download(&self, image_url: &str, dest_dir: &Path) -> Result<String> {
        fs::create_dir_all(dest_dir)?;

        let bytes = self
            .client
            .get(image_url)
            .send()?
            .error_for_status()?
            .bytes()?;

        let path = dest_dir.join(COVER_FILENAME);
        fs::write(&path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "downloaded cover image");

        Ok(image_url.to_string())
    }
}
