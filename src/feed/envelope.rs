//! Wire model of a chart feed response.
//!
//! Every chart shares the same root shape:
//!
//! ```json
//! { "feed": { "title": "...", "author": { "name": "...", "url": "..." },
//!             "copyright": "...", "country": "us", "results": [ ... ] } }
//! ```
//!
//! Only `id` and `artworkUrl100` are required on a result; everything else
//! falls back to a default so a sparse payload still decodes.

use serde::Deserialize;

/// Decoded response body.
///
/// A missing `feed` object is a valid empty result, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedEnvelope {
    #[serde(default)]
    pub feed: Option<FeedResource>,
}

impl FeedEnvelope {
    /// Consumes the envelope and returns its results, empty when `feed` is absent.
    pub fn into_items(self) -> Vec<FeedItem> {
        self.feed.map(|f| f.results).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedResource {
    pub title: String,
    pub id: String,
    pub author: Option<Author>,
    pub copyright: String,
    pub country: String,
    pub icon: String,
    pub updated: String,
    pub results: Vec<FeedItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub url: String,
}

/// One chart entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub artist_id: Option<String>,
    #[serde(default)]
    pub artist_url: Option<String>,
    #[serde(rename = "artworkUrl100")]
    pub artwork_url: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    #[serde(default)]
    pub genre_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAYLOAD: &str = r#"{
        "feed": {
            "title": "Top Albums",
            "id": "https://example.com/albums.json",
            "author": { "name": "Apple", "url": "https://www.apple.com/" },
            "copyright": "Copyright 2022 Apple Inc.",
            "country": "us",
            "icon": "https://www.apple.com/favicon.ico",
            "updated": "Mon, 3 Jan 2022 22:57:56 +0000",
            "results": [
                {
                    "artistName": "Summer Walker",
                    "id": "1590029262",
                    "name": "Still Over It",
                    "releaseDate": "2021-11-05",
                    "kind": "album",
                    "artistId": "990402287",
                    "artistUrl": "https://music.apple.com/us/artist/summer-walker/990402287",
                    "artworkUrl100": "https://example.com/100x100bb.jpg",
                    "genres": [
                        { "genreId": "15", "name": "R&B/Soul", "url": "https://itunes.apple.com/us/genre/id15" }
                    ],
                    "url": "https://music.apple.com/us/album/still-over-it/1590029262"
                }
            ]
        }
    }"#;

    #[test]
    fn test_decode_full_payload() {
        let envelope: FeedEnvelope = serde_json::from_str(FULL_PAYLOAD).unwrap();
        let feed = envelope.feed.as_ref().unwrap();
        assert_eq!(feed.country, "us");
        assert_eq!(feed.author.as_ref().unwrap().name, "Apple");

        let items = envelope.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "1590029262");
        assert_eq!(items[0].artist_name.as_deref(), Some("Summer Walker"));
        assert_eq!(items[0].artwork_url, "https://example.com/100x100bb.jpg");
        assert_eq!(items[0].genres[0].genre_id.as_deref(), Some("15"));
    }

    #[test]
    fn test_missing_feed_is_empty() {
        let envelope: FeedEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.feed.is_none());
        assert!(envelope.into_items().is_empty());
    }

    #[test]
    fn test_missing_results_is_empty() {
        let envelope: FeedEnvelope =
            serde_json::from_str(r#"{"feed": {"title": "Empty"}}"#).unwrap();
        assert!(envelope.into_items().is_empty());
    }

    #[test]
    fn test_sparse_item_decodes_with_defaults() {
        let json = r#"{"feed": {"results": [{"id": "1", "artworkUrl100": "https://a/b.jpg"}]}}"#;
        let items = serde_json::from_str::<FeedEnvelope>(json)
            .unwrap()
            .into_items();
        assert_eq!(items[0].name, "");
        assert!(items[0].artist_name.is_none());
        assert!(items[0].release_date.is_none());
        assert!(items[0].genres.is_empty());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let no_artwork = r#"{"feed": {"results": [{"id": "1"}]}}"#;
        assert!(serde_json::from_str::<FeedEnvelope>(no_artwork).is_err());

        let no_id = r#"{"feed": {"results": [{"artworkUrl100": "https://a/b.jpg"}]}}"#;
        assert!(serde_json::from_str::<FeedEnvelope>(no_id).is_err());
    }
}
