use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::Config;
use crate::core::{CoverDownloader, Language, PageCache};
use crate::extractors::aniworld::{episode_url, season_url};
use crate::extractors::AniworldExtractor;
use crate::utils::sanitize_filename;

#[derive(Parser)]
#[command(name = "aniscrape")]
#[command(about = "AniWorld metadata scraper with on-disk page caching")]
#[command(version)]
pub struct Cli {
    /// Series overview URL, e.g. https://aniworld.to/anime/stream/<name>
    #[arg(value_name = "URL")]
    pub url: String,

    /// Directory for cached pages (overrides the config file)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Output directory for the cover image and JSON export
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Preferred language key (1 = German dub, 2 = Japanese with English
    /// subs, 3 = Japanese with German subs)
    #[arg(short, long, default_value = "1")]
    pub lang: u8,

    /// Optional TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Download the cover image into the output directory
    #[arg(long)]
    pub cover: bool,

    /// Write the scraped metadata as JSON into the output directory
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        let lang =
            Language::from_lang_key(self.lang).context("language key must be 1, 2 or 3")?;

        let mut config = Config::load(self.config.as_deref())?;
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }

        let cache = PageCache::new(&config)?;
        let extractor = AniworldExtractor::new(cache, &config);

        println!("Scraping: {}", self.url);
        let metadata = extractor.scrape(&self.url)?;

        if let Some(name) = &metadata.name {
            println!("Name: {}", name);
        }
        if let Some(rating) = metadata.rating {
            println!("Rating: {}", rating);
        }
        if !metadata.genres.is_empty() {
            println!("Genres: {}", metadata.genres.join(", "));
        }
        if !metadata.countries.is_empty() {
            println!("Countries: {}", metadata.countries.join(", "));
        }
        if !metadata.languages.is_empty() {
            let codes: Vec<&str> = metadata.languages.iter().map(|l| l.code()).collect();
            println!("Languages: {}", codes.join(", "));
        }
        for (&season, &count) in &metadata.episode_counts {
            if season == 0 {
                println!("Movies: {} films", count);
            } else {
                println!("Season {}: {} episodes", season, count);
            }
        }

        // Hosters for the first episode of the first regular season.
        if let Some(&season) = metadata.seasons.iter().find(|&&s| s != 0) {
            let episode = episode_url(&season_url(&self.url, season), 1);
            let entries = extractor.hoster_entries(&episode, lang)?;
            println!("Hosters ({}): {}", lang, entries.len());
            for entry in entries.iter().take(5) {
                match &entry.redirect_url {
                    Some(redirect) => println!("  {} - {}", entry.name, redirect),
                    None => println!("  {}", entry.name),
                }
            }
        }

        if self.cover {
            let image_url = extractor.thumbnail_url(&self.url)?;
            let downloader = CoverDownloader::new(&config)?;
            let source = downloader.download(&image_url, &self.output)?;
            println!("Cover: {}", source);
        }

        if self.json {
            let name = metadata.name.as_deref().unwrap_or("anime");
            let path = self
                .output
                .join(format!("{}.json", sanitize_filename(name)));
            crate::storage::save(&path, &metadata)?;
            println!("Metadata written to {}", path.display());
        }

        Ok(())
    }
}
