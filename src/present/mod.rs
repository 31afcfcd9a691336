//! Display-ready projection of fetched chart results.
//!
//! - [`Group`] - generic keyed container used for every grouping
//! - [`DisplayItem`] - one chart entry, identified by its id
//! - [`Artwork`] - image accessors renderers depend on
//!
//! Mapping is total: a decoded [`FeedItem`](crate::feed::FeedItem) always
//! produces a [`DisplayItem`].

mod group;
mod item;

pub use group::Group;
pub use item::{map_item, map_section, Artwork, CategorySection, DisplayItem, GenreLabel};
