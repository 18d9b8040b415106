use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;

/// On-disk page cache, the single point of contact between the extractors
/// and the network.
///
/// Every page is fetched at most once per cache directory: a hit reads the
/// stored body verbatim with no freshness check, so repeated extraction runs
/// operate against a fixed snapshot of the site. Files are written once and
/// never invalidated; purging the directory is left to the caller.
pub struct PageCache {
    root: PathBuf,
    client: reqwest::blocking::Client,
}

impl PageCache {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            root: config.cache_dir.clone(),
            client,
        })
    }

    /// Derives the cache file name for a URL.
    ///
    /// Pure function of the URL: the scheme is stripped and path separators
    /// become underscores, so the same URL always lands on the same file.
    pub fn cache_key(url: &str) -> String {
        let stripped = url
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        format!("{}.html", stripped.replace('/', "_"))
    }

    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.root.join(Self::cache_key(url))
    }

    /// Returns the page body for `url`, reading the cached copy when one
    /// exists and fetching + persisting it otherwise.
    pub fn get_or_fetch(&self, url: &str) -> Result<String> {
        let path = self.cache_path(url);
        if path.exists() {
            debug!(path = %path.display(), "using cached page");
            return Ok(fs::read_to_string(&path)?);
        }

        info!(%url, "downloading page");
        let body = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .text()?;

        fs::create_dir_all(&self.root)?;
        fs::write(&path, &body)?;
        debug!(path = %path.display(), bytes = body.len(), "cached page");

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_in(dir: &std::path::Path) -> PageCache {
        let config = Config {
            cache_dir: dir.to_path_buf(),
            ..Config::default()
        };
        PageCache::new(&config).unwrap()
    }

    #[test]
    fn cache_key_strips_scheme_and_flattens_path() {
        assert_eq!(
            PageCache::cache_key("https://aniworld.to/anime/stream/example"),
            "aniworld.to_anime_stream_example.html"
        );
        assert_eq!(
            PageCache::cache_key("http://aniworld.to/anime/stream/example"),
            "aniworld.to_anime_stream_example.html"
        );
    }

    #[test]
    fn cache_key_is_deterministic() {
        let url = "https://aniworld.to/anime/stream/example/staffel-1/episode-1";
        assert_eq!(PageCache::cache_key(url), PageCache::cache_key(url));
    }

    #[test]
    fn distinct_urls_do_not_collide() {
        let a = PageCache::cache_key("https://aniworld.to/anime/stream/a");
        let b = PageCache::cache_key("https://aniworld.to/anime/stream/b");
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_page_is_served_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());

        // The host does not resolve; a network attempt would fail the test.
        let url = "https://aniworld.invalid/anime/stream/example";
        fs::write(cache.cache_path(url), "<html>seeded</html>").unwrap();

        let first = cache.get_or_fetch(url).unwrap();
        let second = cache.get_or_fetch(url).unwrap();
        assert_eq!(first, "<html>seeded</html>");
        assert_eq!(first, second);
    }
}
