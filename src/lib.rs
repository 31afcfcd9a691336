//! Concurrent chart feed fetching with a deterministic merge.
//!
//! [`feed::FanOutCoordinator`] fetches several chart categories at once,
//! waits for all of them, and returns one [`present::CategorySection`] per
//! category in canonical order. [`board::ChartBoard`] keeps the latest
//! complete set for consumers.

pub mod board;
pub mod config;
pub mod feed;
pub mod present;
