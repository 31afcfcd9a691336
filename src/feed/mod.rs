//! Chart feed fetching.
//!
//! - [`catalog`] - static category table: request descriptors and titles
//! - [`client`] - one HTTP fetch per category, decoded into a [`FeedEnvelope`]
//! - [`coordinator`] - concurrent fan-out over categories with an ordered merge
//!
//! # Example
//!
//! ```no_run
//! use chartfeed::feed::{CategoryId, FanOutCoordinator, HttpResourceClient};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), chartfeed::feed::FetchError> {
//! let client = HttpResourceClient::new(reqwest::Client::new(), "https://rss.itunes.apple.com", "us")?;
//! let coordinator = FanOutCoordinator::new(Arc::new(client));
//!
//! // Sections come back in canonical category order
//! let sections = coordinator.fetch_all(&CategoryId::ALL).await?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod client;
mod coordinator;
mod envelope;

pub use catalog::{
    descriptor_for, expected_kinds, title_for, CategoryId, RequestDescriptor, UnknownCategory,
};
pub use client::{FetchError, HttpResourceClient, ResourceClient, DEFAULT_BASE_URL};
pub use coordinator::{
    BatchOutcome, CategoryFailure, Classification, FailurePolicy, FanOutCoordinator,
};
pub use envelope::{Author, FeedEnvelope, FeedItem, FeedResource, Genre};
