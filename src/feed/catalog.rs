//! Static mapping from chart category to request descriptor and title.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of results requested from each category.
const RESULT_LIMIT: u32 = 4;

/// A chart category fetched independently of the others.
///
/// Declaration order is the canonical presentation order: merged results are
/// always sorted by this `Ord` impl, never by arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryId {
    Apps,
    Podcasts,
    TvShows,
    Music,
}

impl CategoryId {
    /// Every supported category, in canonical order.
    pub const ALL: [CategoryId; 4] = [
        CategoryId::Apps,
        CategoryId::Podcasts,
        CategoryId::TvShows,
        CategoryId::Music,
    ];

    /// Short identifier used on the command line and in logs.
    pub fn slug(self) -> &'static str {
        match self {
            CategoryId::Apps => "apps",
            CategoryId::Podcasts => "podcasts",
            CategoryId::TvShows => "tv-shows",
            CategoryId::Music => "music",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown category '{0}' (expected one of: apps, podcasts, tv-shows, music)")]
pub struct UnknownCategory(String);

impl FromStr for CategoryId {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CategoryId::ALL
            .into_iter()
            .find(|id| id.slug() == normalized || id.slug().replace('-', "") == normalized)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Everything needed to address one chart resource on the wire.
///
/// Built on demand from a [`CategoryId`]; fetch-scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Media type path segment (e.g. `ios-apps`)
    pub media_type: &'static str,
    /// Chart name (e.g. `top-free`)
    pub chart: &'static str,
    /// Genre filter; `all` disables filtering
    pub genre: &'static str,
    /// Maximum number of results
    pub limit: u32,
    /// Response format extension
    pub format: &'static str,
}

impl RequestDescriptor {
    /// Path of this resource relative to the service root, without the country.
    pub fn path_segments(&self) -> [String; 5] {
        [
            self.media_type.to_string(),
            self.chart.to_string(),
            self.genre.to_string(),
            self.limit.to_string(),
            format!("explicit.{}", self.format),
        ]
    }
}

/// Returns the request descriptor for a category.
pub fn descriptor_for(id: CategoryId) -> RequestDescriptor {
    let (media_type, chart) = match id {
        CategoryId::Apps => ("ios-apps", "top-free"),
        CategoryId::Podcasts => ("podcasts", "top-podcasts"),
        CategoryId::TvShows => ("tv-shows", "top-tv-episodes"),
        CategoryId::Music => ("apple-music", "top-albums"),
    };

    RequestDescriptor {
        media_type,
        chart,
        genre: "all",
        limit: RESULT_LIMIT,
        format: "json",
    }
}

/// Returns the human-readable section title for a category.
pub fn title_for(id: CategoryId) -> &'static str {
    match id {
        CategoryId::Apps => "Apps From the App Store",
        CategoryId::Podcasts => "Podcasts",
        CategoryId::TvShows => "TV Shows",
        CategoryId::Music => "Music",
    }
}

/// `kind` discriminators a category's results are expected to carry.
pub fn expected_kinds(id: CategoryId) -> &'static [&'static str] {
    match id {
        CategoryId::Apps => &["iosSoftware"],
        CategoryId::Podcasts => &["podcast"],
        CategoryId::TvShows => &["tvEpisode", "tvSeason"],
        CategoryId::Music => &["album"],
    }
}
