use std::collections::BTreeMap;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::config::{Config, ScanOffsets};
use crate::core::{AnimeMetadata, Hoster, Language, PageCache, TitleLanguage};
use crate::error::{Result, ScrapeError};
use crate::utils::decode_entities_twice;

/// Builds the listing URL for a season, with `0` mapping onto the movies
/// pseudo-season.
pub fn season_url(base: &str, season: u32) -> String {
    let base = base.trim_end_matches('/');
    if season == 0 {
        format!("{base}/filme")
    } else {
        format!("{base}/staffel-{season}")
    }
}

/// Builds the page URL for one episode of a season listing.
pub fn episode_url(season_url: &str, episode: u32) -> String {
    let season_url = season_url.trim_end_matches('/');
    if season_url.ends_with("/filme") {
        format!("{season_url}/film-{episode}")
    } else {
        format!("{season_url}/episode-{episode}")
    }
}

/// Field extractors for the aniworld.to page layout.
///
/// Every operation pulls the page body through the [`PageCache`] and applies
/// one heuristic to it. The pages are not treated as well-formed markup:
/// most facts are recovered by scanning raw lines for literal markers, a few
/// structural ones go through CSS selectors. A heuristic that finds nothing
/// yields `None` or an empty list; only the cover image is required to
/// exist.
pub struct AniworldExtractor {
    cache: PageCache,
    base_url: String,
    offsets: ScanOffsets,
    max_probe: u32,
}

impl AniworldExtractor {
    pub fn new(cache: PageCache, config: &Config) -> Self {
        Self {
            cache,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            offsets: config.offsets.clone(),
            max_probe: config.max_probe,
        }
    }

    pub fn suitable(url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host == "aniworld.to" || host.ends_with(".aniworld.to"))
    }

    /// Series name, taken from the description meta tag.
    pub fn anime_name(&self, url: &str) -> Result<Option<String>> {
        let html = self.cache.get_or_fetch(url)?;
        for line in html.lines() {
            if !line.contains(r#"<meta name="description" content=""#) {
                continue;
            }
            let name = line
                .split(" von ")
                .nth(1)
                .and_then(|rest| rest.split(" und ").next());
            return Ok(name.map(|n| decode_entities_twice(n.trim())));
        }
        Ok(None)
    }

    /// Resolves the cover image URL.
    ///
    /// The one extractor where absence is a hard error: every series page
    /// carries a cover box, so a page without one means the layout changed.
    pub fn thumbnail_url(&self, url: &str) -> Result<String> {
        let html = self.cache.get_or_fetch(url)?;
        for line in html.lines() {
            if !line.contains("seriesCoverBox") {
                continue;
            }
            if let Ok(re) = Regex::new(r#"data-src="([^"]+)""#) {
                if let Some(caps) = re.captures(line) {
                    let image_url = format!("{}{}", self.base_url, &caps[1]);
                    debug!(%image_url, "resolved cover image");
                    return Ok(image_url);
                }
            }
        }
        Err(ScrapeError::CoverNotFound {
            url: url.to_string(),
        })
    }

    /// Counts episodes on a season listing.
    ///
    /// The pages have no structural episode counter, so increasing numbers
    /// are probed against the full text (`Folge N`, or `Film N` on the
    /// movies listing). Numbering is contiguous from 1; the first missing
    /// number ends the count, and the probe never scans past it.
    pub fn episode_count(&self, url: &str) -> Result<u32> {
        let text = self.cache.get_or_fetch(url)?;
        let marker = if url.contains("film") { "Film" } else { "Folge" };

        let mut count = 0;
        for n in 1..=self.max_probe {
            if !text.contains(&format!("{marker} {n}")) {
                break;
            }
            count = n;
        }
        debug!(%url, count, "counted episodes");
        Ok(count)
    }

    /// Season indexes present on a series page, `0` first when the page has
    /// a movies bucket. Seasons follow the same contiguous-run rule as
    /// episodes.
    pub fn seasons(&self, url: &str) -> Result<Vec<u32>> {
        let text = self.cache.get_or_fetch(url)?;

        let mut seasons = Vec::new();
        if text.contains("Alle Filme") {
            seasons.push(0);
        }
        for n in 1..=self.max_probe {
            if !text.contains(&format!("Staffel {n}")) {
                break;
            }
            seasons.push(n);
        }
        Ok(seasons)
    }

    /// Episode title in the requested language, if the page carries one.
    pub fn episode_title(&self, url: &str, lang: TitleLanguage) -> Result<Option<String>> {
        let (open, close) = match lang {
            TitleLanguage::German => (r#"<span class="episodeGermanTitle">"#, "</span>"),
            TitleLanguage::English => (r#"<small class="episodeEnglishTitle">"#, "</small>"),
        };

        let html = self.cache.get_or_fetch(url)?;
        for line in html.lines() {
            let Some((_, rest)) = line.split_once(open) else {
                continue;
            };
            if let Some((title, _)) = rest.split_once(close) {
                return Ok(Some(decode_entities_twice(title.trim())));
            }
        }
        Ok(None)
    }

    /// Language variants offered on an episode page.
    ///
    /// A single selector line may carry several `data-lang-key` values and
    /// contributes each of them, checked in fixed 1/2/3 order.
    pub fn languages(&self, url: &str) -> Result<Vec<Language>> {
        let html = self.cache.get_or_fetch(url)?;

        let mut langs = Vec::new();
        for line in html.lines() {
            if !line.contains(r#"class="changeLanguageBox""#) {
                continue;
            }
            for lang in Language::ALL {
                let marker = format!(r#"data-lang-key="{}""#, lang.lang_key());
                if line.contains(&marker) && !langs.contains(&lang) {
                    langs.push(lang);
                }
            }
        }
        Ok(langs)
    }

    /// Hoster names offering the episode in the requested language.
    ///
    /// A hoster icon line counts only when the language key sits at one of
    /// the configured lookback offsets, which tolerates the two icon-block
    /// layouts the site uses. Names are deduplicated in first-seen order.
    pub fn hosters(&self, url: &str, lang: Language) -> Result<Vec<String>> {
        let html = self.cache.get_or_fetch(url)?;
        let lines: Vec<&str> = html.lines().collect();
        let key_marker = format!(r#"data-lang-key="{}""#, lang.lang_key());

        let mut hosters: Vec<String> = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if !(line.contains("icon ") && line.contains("Hoster ")) {
                continue;
            }
            let lang_matches = self.offsets.hoster_lang_lookback.iter().any(|&back| {
                i.checked_sub(back)
                    .is_some_and(|j| lines[j].contains(&key_marker))
            });
            if !lang_matches {
                continue;
            }
            let Some(rest) = line.split("Hoster ").nth(1) else {
                continue;
            };
            if let Some(name) = rest.split("\">").next() {
                if !hosters.iter().any(|h| h == name) {
                    hosters.push(name.to_string());
                }
            }
        }
        info!(%url, lang = %lang, ?hosters, "found hosters");
        Ok(hosters)
    }

    /// Redirect link for one hoster in one language, when present.
    ///
    /// A redirect anchor counts only when the configured lookahead line
    /// names the hoster and the configured lookback line carries the
    /// language key. First match wins; offsets falling outside the page are
    /// non-matches.
    pub fn redirect_url(
        &self,
        url: &str,
        hoster: &str,
        lang: Language,
    ) -> Result<Option<String>> {
        let html = self.cache.get_or_fetch(url)?;
        let lines: Vec<&str> = html.lines().collect();
        let key_marker = format!(r#"data-lang-key="{}""#, lang.lang_key());
        let hoster_marker = format!("Hoster {hoster}");

        for (i, line) in lines.iter().enumerate() {
            if !line.contains(r#"href="/redirect/"#) {
                continue;
            }
            let ahead = i + self.offsets.redirect_hoster_lookahead;
            if !lines.get(ahead).is_some_and(|l| l.contains(&hoster_marker)) {
                continue;
            }
            let key_line = i.checked_sub(self.offsets.redirect_lang_lookback);
            if !key_line.is_some_and(|j| lines[j].contains(&key_marker)) {
                continue;
            }
            if let Ok(re) = Regex::new(r#"href="([^"]+)""#) {
                if let Some(caps) = re.captures(line) {
                    let redirect = format!("{}{}", self.base_url, &caps[1]);
                    info!(%redirect, "found redirect url");
                    return Ok(Some(redirect));
                }
            }
        }
        Ok(None)
    }

    /// Hosters plus their resolved redirect links for one language.
    pub fn hoster_entries(&self, url: &str, lang: Language) -> Result<Vec<Hoster>> {
        let names = self.hosters(url, lang)?;
        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let redirect_url = self.redirect_url(url, &name, lang)?;
            entries.push(Hoster { name, redirect_url });
        }
        Ok(entries)
    }

    /// Community rating, a small integer.
    pub fn rating(&self, url: &str) -> Result<Option<u32>> {
        let html = self.cache.get_or_fetch(url)?;
        let rating = self
            .select_texts(&html, r#"span[itemprop="ratingValue"]"#)
            .into_iter()
            .next()
            .and_then(|text| text.trim().parse().ok());
        Ok(rating)
    }

    /// Full series description from the expandable description attribute.
    pub fn description(&self, url: &str) -> Result<Option<String>> {
        let html = self.cache.get_or_fetch(url)?;
        let description = html
            .split_once(r#"data-full-description=""#)
            .and_then(|(_, rest)| rest.split_once("\">"))
            .map(|(text, _)| decode_entities_twice(text));
        Ok(description)
    }

    pub fn genres(&self, url: &str) -> Result<Vec<String>> {
        let html = self.cache.get_or_fetch(url)?;
        Ok(self.select_texts(&html, "div.genres a.genreButton"))
    }

    pub fn actors(&self, url: &str) -> Result<Vec<String>> {
        let html = self.cache.get_or_fetch(url)?;
        Ok(self.select_texts(&html, r#"li[itemprop="actor"] a span"#))
    }

    pub fn producers(&self, url: &str) -> Result<Vec<String>> {
        let html = self.cache.get_or_fetch(url)?;
        Ok(self.select_texts(&html, r#"li[itemprop="creator"] a span"#))
    }

    pub fn directors(&self, url: &str) -> Result<Vec<String>> {
        let html = self.cache.get_or_fetch(url)?;
        Ok(self.select_texts(&html, r#"li[itemprop="director"] a span"#))
    }

    pub fn countries(&self, url: &str) -> Result<Vec<String>> {
        let html = self.cache.get_or_fetch(url)?;
        Ok(self.select_texts(&html, r#"li[itemprop="countryOfOrigin"] a span"#))
    }

    /// Scrapes the full metadata aggregate for a series page, including the
    /// per-season episode counts from the season listings.
    pub fn scrape(&self, url: &str) -> Result<AnimeMetadata> {
        let parsed =
            Url::parse(url).map_err(|_| ScrapeError::UnsupportedUrl(url.to_string()))?;
        if !Self::suitable(&parsed) {
            return Err(ScrapeError::UnsupportedUrl(url.to_string()));
        }

        info!(%url, "scraping series metadata");
        let seasons = self.seasons(url)?;
        let mut episode_counts = BTreeMap::new();
        for &season in &seasons {
            let listing = season_url(url, season);
            episode_counts.insert(season, self.episode_count(&listing)?);
        }

        Ok(AnimeMetadata {
            name: self.anime_name(url)?,
            rating: self.rating(url)?,
            description: self.description(url)?,
            genres: self.genres(url)?,
            actors: self.actors(url)?,
            producers: self.producers(url)?,
            directors: self.directors(url)?,
            countries: self.countries(url)?,
            languages: self.languages(url)?,
            seasons,
            episode_counts,
        })
    }

    fn select_texts(&self, html: &str, selector: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        let document = Html::parse_document(html);
        document
            .select(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_url_maps_zero_onto_movies() {
        let base = "https://aniworld.to/anime/stream/example";
        assert_eq!(
            season_url(base, 0),
            "https://aniworld.to/anime/stream/example/filme"
        );
        assert_eq!(
            season_url(base, 2),
            "https://aniworld.to/anime/stream/example/staffel-2"
        );
    }

    #[test]
    fn episode_url_follows_listing_kind() {
        assert_eq!(
            episode_url("https://aniworld.to/anime/stream/example/staffel-1", 3),
            "https://aniworld.to/anime/stream/example/staffel-1/episode-3"
        );
        assert_eq!(
            episode_url("https://aniworld.to/anime/stream/example/filme", 1),
            "https://aniworld.to/anime/stream/example/filme/film-1"
        );
    }

    #[test]
    fn suitable_matches_only_the_target_site() {
        let ok = Url::parse("https://aniworld.to/anime/stream/example").unwrap();
        let sub = Url::parse("https://www.aniworld.to/anime/stream/example").unwrap();
        let other = Url::parse("https://example.com/anime").unwrap();
        assert!(AniworldExtractor::suitable(&ok));
        assert!(AniworldExtractor::suitable(&sub));
        assert!(!AniworldExtractor::suitable(&other));
    }
}
