use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Audio/subtitle variants offered by the site, keyed by its
/// `data-lang-key` attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    /// German dub, `data-lang-key="1"`.
    #[serde(rename = "de")]
    German,
    /// Japanese audio with English subtitles, `data-lang-key="2"`.
    #[serde(rename = "jp-en")]
    JapaneseEnglishSub,
    /// Japanese audio with German subtitles, `data-lang-key="3"`.
    #[serde(rename = "jp-de")]
    JapaneseGermanSub,
}

impl Language {
    /// Fixed check order used when scanning a language selector line.
    pub const ALL: [Language; 3] = [
        Language::German,
        Language::JapaneseEnglishSub,
        Language::JapaneseGermanSub,
    ];

    pub fn lang_key(self) -> u8 {
        match self {
            Language::German => 1,
            Language::JapaneseEnglishSub => 2,
            Language::JapaneseGermanSub => 3,
        }
    }

    pub fn from_lang_key(key: u8) -> Option<Self> {
        match key {
            1 => Some(Language::German),
            2 => Some(Language::JapaneseEnglishSub),
            3 => Some(Language::JapaneseGermanSub),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::German => "de",
            Language::JapaneseEnglishSub => "jp-en",
            Language::JapaneseGermanSub => "jp-de",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Language variants of an episode title on the episode page itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleLanguage {
    German,
    English,
}

/// A streaming hoster offering an episode, with the redirect link resolved
/// for one requested language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hoster {
    pub name: String,
    pub redirect_url: Option<String>,
}

/// Everything the scraper knows about one series.
///
/// Each field is extracted independently and is independently optional; a
/// page that yields no genres can still yield a rating. Season `0` is the
/// movies pseudo-season.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimeMetadata {
    pub name: Option<String>,
    pub rating: Option<u32>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub producers: Vec<String>,
    pub directors: Vec<String>,
    pub countries: Vec<String>,
    pub languages: Vec<Language>,
    pub seasons: Vec<u32>,
    /// Episode count per season index.
    pub episode_counts: BTreeMap<u32, u32>,
}
