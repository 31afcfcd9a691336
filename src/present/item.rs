use crate::feed::{CategoryId, FeedItem, Genre};
use crate::present::Group;
use std::hash::{Hash, Hasher};
use url::Url;

/// Something that can be drawn as a single image.
///
/// Renderers depend on this trait rather than on [`DisplayItem`] directly.
pub trait Artwork {
    fn image_url(&self) -> &str;
    fn thumbnail_url(&self) -> &str;
}

/// One category and its display items, in feed order.
pub type CategorySection = Group<CategoryId, DisplayItem>;

/// Display-ready projection of a [`FeedItem`].
///
/// Optional wire fields are flattened to empty strings. Equality and hashing
/// use `id` only, so the same chart entry keeps its identity across fetches.
#[derive(Debug, Clone)]
pub struct DisplayItem {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    pub release_date: String,
    pub kind: String,
    pub copyright: String,
    pub artist_id: String,
    pub artist_url: String,
    pub artwork_url: String,
    pub artwork_thumbnail_url: String,
    pub genres: Vec<GenreLabel>,
    /// Canonical store page; `None` when the feed sent an unparseable URL
    pub url: Option<Url>,
}

impl PartialEq for DisplayItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DisplayItem {}

impl Hash for DisplayItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Artwork for DisplayItem {
    fn image_url(&self) -> &str {
        &self.artwork_url
    }

    fn thumbnail_url(&self) -> &str {
        &self.artwork_thumbnail_url
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreLabel {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl From<Genre> for GenreLabel {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.genre_id.unwrap_or_default(),
            name: genre.name.unwrap_or_default(),
            url: genre.url.unwrap_or_default(),
        }
    }
}

/// Maps one decoded feed item. Never fails.
pub fn map_item(item: FeedItem) -> DisplayItem {
    let url = match Url::parse(&item.url) {
        Ok(url) => Some(url),
        Err(e) => {
            if !item.url.is_empty() {
                tracing::debug!(
                    id = %item.id,
                    url = %item.url,
                    error = %e,
                    "Ignoring unparseable item URL"
                );
            }
            None
        }
    };

    DisplayItem {
        name: item.name,
        artist_name: item.artist_name.unwrap_or_default(),
        release_date: item.release_date.unwrap_or_default(),
        kind: item.kind,
        copyright: item.copyright.unwrap_or_default(),
        artist_id: item.artist_id.unwrap_or_default(),
        artist_url: item.artist_url.unwrap_or_default(),
        artwork_thumbnail_url: item.artwork_url.clone(),
        artwork_url: item.artwork_url,
        genres: item.genres.into_iter().map(GenreLabel::from).collect(),
        url,
        id: item.id,
    }
}

/// Maps a category's decoded items into its section, preserving feed order.
pub fn map_section(id: CategoryId, items: Vec<FeedItem>) -> CategorySection {
    Group::new(id, items.into_iter().map(map_item).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse_item(id: &str) -> FeedItem {
        FeedItem {
            id: id.to_string(),
            name: String::new(),
            artist_name: None,
            release_date: None,
            kind: String::new(),
            copyright: None,
            artist_id: None,
            artist_url: None,
            artwork_url: format!("https://img.example.com/{id}/100x100bb.jpg"),
            genres: Vec::new(),
            url: String::new(),
        }
    }

    #[test]
    fn test_sparse_item_maps_to_defaults() {
        let item = map_item(sparse_item("42"));

        assert_eq!(item.id, "42");
        assert_eq!(item.artist_name, "");
        assert_eq!(item.release_date, "");
        assert_eq!(item.copyright, "");
        assert_eq!(item.artist_id, "");
        assert_eq!(item.artist_url, "");
        assert!(item.genres.is_empty());
        assert!(item.url.is_none());
    }

    #[test]
    fn test_full_item_keeps_fields() {
        let mut raw = sparse_item("7");
        raw.name = "Still Over It".into();
        raw.artist_name = Some("Summer Walker".into());
        raw.release_date = Some("2021-11-05".into());
        raw.kind = "album".into();
        raw.url = "https://music.apple.com/us/album/still-over-it/7".into();
        raw.genres = vec![Genre {
            genre_id: Some("15".into()),
            name: None,
            url: Some("https://itunes.apple.com/us/genre/id15".into()),
        }];

        let item = map_item(raw);
        assert_eq!(item.name, "Still Over It");
        assert_eq!(item.artist_name, "Summer Walker");
        assert_eq!(item.release_date, "2021-11-05");
        assert_eq!(
            item.url.as_ref().map(Url::as_str),
            Some("https://music.apple.com/us/album/still-over-it/7")
        );
        assert_eq!(
            item.genres,
            vec![GenreLabel {
                id: "15".into(),
                name: String::new(),
                url: "https://itunes.apple.com/us/genre/id15".into(),
            }]
        );
    }

    #[test]
    fn test_bad_url_does_not_fail_mapping() {
        let mut raw = sparse_item("1");
        raw.url = "not a url".into();
        assert!(map_item(raw).url.is_none());
    }

    #[test]
    fn test_artwork_accessors() {
        let item = map_item(sparse_item("9"));
        let artwork: &dyn Artwork = &item;
        assert_eq!(artwork.image_url(), "https://img.example.com/9/100x100bb.jpg");
        assert_eq!(artwork.thumbnail_url(), artwork.image_url());
    }

    #[test]
    fn test_identity_is_id_only() {
        let a = map_item(sparse_item("1"));
        let mut renamed = sparse_item("1");
        renamed.name = "Renamed".into();
        let b = map_item(renamed);

        assert_eq!(a, b);
        assert_ne!(a, map_item(sparse_item("2")));
    }

    #[test]
    fn test_map_section_preserves_order() {
        let section = map_section(
            CategoryId::Podcasts,
            vec![sparse_item("c"), sparse_item("a"), sparse_item("b")],
        );
        assert_eq!(section.key, CategoryId::Podcasts);
        let ids: Vec<_> = section.values.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn test_map_section_empty() {
        let section = map_section(CategoryId::Music, Vec::new());
        assert!(section.is_empty());
    }
}
