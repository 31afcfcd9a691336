//! Caller-owned view of the most recent chart batch.
//!
//! A [`ChartBoard`] publishes whole [`ChartSnapshot`]s only: a refresh either
//! replaces the snapshot at once or leaves the previous one untouched.
//! Subscribers never observe a half-filled batch, and a snapshot always names
//! the categories that were requested but did not produce a section.

use crate::feed::{CategoryId, FailurePolicy, FanOutCoordinator, FetchError};
use crate::present::CategorySection;
use std::sync::Arc;
use tokio::sync::watch;

/// One published batch: the sections that arrived and the categories that
/// failed. Both lists are in canonical category order.
#[derive(Debug, Default)]
pub struct ChartSnapshot {
    pub sections: Vec<CategorySection>,
    pub failed: Vec<CategoryId>,
}

impl ChartSnapshot {
    /// True when every requested category produced a section.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct ChartBoard {
    coordinator: FanOutCoordinator,
    snapshot_tx: watch::Sender<Arc<ChartSnapshot>>,
}

impl ChartBoard {
    pub fn new(coordinator: FanOutCoordinator) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(ChartSnapshot::default()));
        Self {
            coordinator,
            snapshot_tx,
        }
    }

    /// Receiver notified every time a refresh publishes a new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ChartSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<ChartSnapshot> {
        Arc::clone(&self.snapshot_tx.borrow())
    }

    /// Fetches `ids` and publishes the outcome as one atomic replacement.
    ///
    /// Under [`FailurePolicy::BestEffort`] the published snapshot lists every
    /// category that failed, including the case where all of them did.
    ///
    /// # Errors
    ///
    /// Propagates a batch failure from the coordinator (fail-fast policy
    /// only). The previously published snapshot stays in place.
    pub async fn refresh(&self, ids: &[CategoryId]) -> Result<Arc<ChartSnapshot>, FetchError> {
        let snapshot = match self.coordinator.policy() {
            FailurePolicy::BestEffort => {
                let outcome = self.coordinator.fetch_all_reporting(ids).await;
                ChartSnapshot {
                    failed: outcome.failures.iter().map(|f| f.category).collect(),
                    sections: outcome.sections,
                }
            }
            FailurePolicy::FailFast => match self.coordinator.fetch_all(ids).await {
                Ok(sections) => ChartSnapshot {
                    sections,
                    failed: Vec::new(),
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Chart refresh failed, keeping previous snapshot");
                    return Err(e);
                }
            },
        };

        let snapshot = Arc::new(snapshot);
        self.snapshot_tx.send_replace(Arc::clone(&snapshot));
        if snapshot.is_complete() {
            tracing::debug!(sections = snapshot.sections.len(), "Published chart snapshot");
        } else {
            tracing::warn!(
                sections = snapshot.sections.len(),
                failed = ?snapshot.failed,
                "Published partial chart snapshot"
            );
        }
        Ok(snapshot)
    }
}
