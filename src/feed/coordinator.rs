use crate::config::Config;
use crate::feed::catalog::{descriptor_for, expected_kinds, CategoryId};
use crate::feed::client::{FetchError, ResourceClient};
use crate::present::{map_section, CategorySection};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// What a single category failure does to the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log the failure, omit the category, return the rest.
    #[default]
    BestEffort,
    /// Cancel the remaining fetches and return the first error.
    FailFast,
}

/// How results are attributed to a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Classification {
    /// The category a request was issued for owns everything it returns.
    #[default]
    TrustRequest,
    /// Every result's `kind` must be one the category expects.
    VerifyKind,
}

/// A category whose fetch did not produce a section.
#[derive(Debug)]
pub struct CategoryFailure {
    pub category: CategoryId,
    pub error: FetchError,
}

/// Every outcome of a batch: sections that completed and categories that failed.
///
/// Both lists are sorted by canonical category order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub sections: Vec<CategorySection>,
    pub failures: Vec<CategoryFailure>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches several chart categories concurrently and merges them in
/// canonical order.
///
/// Each unique category becomes one fetch future; all of them are driven
/// together by a single `buffer_unordered` stream owned by the calling
/// task, and each future hands its own `(category, result)` back to the
/// join. Sections are only assembled after every fetch has finished, so
/// arrival order never reaches the output. Dropping a `fetch_all` future
/// drops every in-flight fetch with it.
pub struct FanOutCoordinator {
    client: Arc<dyn ResourceClient>,
    policy: FailurePolicy,
    classification: Classification,
    max_concurrency: usize,
    progress_tx: Option<mpsc::Sender<(usize, usize)>>,
}

impl FanOutCoordinator {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self {
            client,
            policy: FailurePolicy::default(),
            classification: Classification::default(),
            max_concurrency: 0,
            progress_tx: None,
        }
    }

    pub fn from_config(client: Arc<dyn ResourceClient>, config: &Config) -> Self {
        let classification = if config.verify_kinds {
            Classification::VerifyKind
        } else {
            Classification::TrustRequest
        };

        Self::new(client)
            .with_policy(config.failure_policy)
            .with_classification(classification)
            .with_max_concurrency(config.max_concurrency)
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Caps simultaneous fetches. 0 runs every category at once.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit;
        self
    }

    /// Reports `(completed, total)` after each fetch reaches a terminal state.
    ///
    /// Progress is sent with `try_send`; a full or closed channel drops the
    /// update rather than stalling the batch.
    pub fn with_progress(mut self, progress_tx: mpsc::Sender<(usize, usize)>) -> Self {
        self.progress_tx = Some(progress_tx);
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Fetches every requested category and returns their sections in
    /// canonical order.
    ///
    /// Duplicate identifiers are fetched once. An empty request returns an
    /// empty list without touching the network.
    ///
    /// # Errors
    ///
    /// Only under [`FailurePolicy::FailFast`]: the first category failure,
    /// after every other in-flight fetch has been cancelled. Under
    /// [`FailurePolicy::BestEffort`] failed categories are logged and
    /// omitted; use [`fetch_all_reporting`](Self::fetch_all_reporting) to
    /// see which.
    pub async fn fetch_all(
        &self,
        ids: &[CategoryId],
    ) -> Result<Vec<CategorySection>, FetchError> {
        match self.policy {
            FailurePolicy::BestEffort => Ok(self.fetch_all_reporting(ids).await.sections),
            FailurePolicy::FailFast => self.fetch_all_or_fail(ids).await,
        }
    }

    /// Fetches every requested category and reports both sections and
    /// failures, regardless of the configured policy.
    pub async fn fetch_all_reporting(&self, ids: &[CategoryId]) -> BatchOutcome {
        let unique = dedup(ids);
        if unique.is_empty() {
            return BatchOutcome::default();
        }

        let total = unique.len();
        let outcomes: Vec<(CategoryId, Result<CategorySection, FetchError>)> =
            self.dispatch(unique).collect().await;

        let mut batch = BatchOutcome::default();
        for (category, result) in outcomes {
            match result {
                Ok(section) => batch.sections.push(section),
                Err(error) => {
                    tracing::warn!(
                        category = %category,
                        error = %error,
                        "Chart fetch failed, omitting category"
                    );
                    batch.failures.push(CategoryFailure { category, error });
                }
            }
        }

        batch.sections.sort_by_key(|s| s.key);
        batch.failures.sort_by_key(|f| f.category);

        tracing::info!(
            requested = total,
            succeeded = batch.sections.len(),
            failed = batch.failures.len(),
            "Chart batch complete"
        );
        batch
    }

    async fn fetch_all_or_fail(
        &self,
        ids: &[CategoryId],
    ) -> Result<Vec<CategorySection>, FetchError> {
        let unique = dedup(ids);
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let total = unique.len();
        let mut sections = Vec::with_capacity(total);
        let mut outcomes = std::pin::pin!(self.dispatch(unique));

        while let Some((category, result)) = outcomes.next().await {
            match result {
                Ok(section) => sections.push(section),
                Err(error) => {
                    // Returning drops `outcomes`, cancelling the fetches still running
                    tracing::warn!(
                        category = %category,
                        error = %error,
                        pending = total - sections.len() - 1,
                        "Chart fetch failed, abandoning batch"
                    );
                    return Err(error);
                }
            }
        }

        sections.sort_by_key(|s| s.key);
        tracing::info!(requested = total, "Chart batch complete");
        Ok(sections)
    }

    /// Starts one fetch per category and yields outcomes in completion order.
    fn dispatch(
        &self,
        categories: Vec<CategoryId>,
    ) -> impl Stream<Item = (CategoryId, Result<CategorySection, FetchError>)> + '_ {
        let total = categories.len();
        let limit = match self.max_concurrency {
            0 => total,
            n => n.min(total),
        }
        .max(1);
        let completed = Arc::new(AtomicUsize::new(0));

        stream::iter(categories)
            .map(move |category| {
                let completed = Arc::clone(&completed);
                async move {
                    let result = self.fetch_category(category).await;

                    let done = completed.fetch_add(1, Ordering::Relaxed).saturating_add(1);
                    if let Some(tx) = &self.progress_tx {
                        if let Err(e) = tx.try_send((done, total)) {
                            tracing::debug!(
                                error = %e,
                                done = done,
                                total = total,
                                "Progress update dropped"
                            );
                        }
                    }

                    (category, result)
                }
            })
            .buffer_unordered(limit)
    }

    async fn fetch_category(&self, category: CategoryId) -> Result<CategorySection, FetchError> {
        let descriptor = descriptor_for(category);
        let items = self.client.fetch(&descriptor).await?.into_items();

        if self.classification == Classification::VerifyKind {
            let expected = expected_kinds(category);
            if let Some(stray) = items.iter().find(|i| !expected.contains(&i.kind.as_str())) {
                return Err(FetchError::InvalidCategoryMapping {
                    category,
                    kind: stray.kind.clone(),
                });
            }
        }

        tracing::debug!(category = %category, items = items.len(), "Chart fetch complete");
        Ok(map_section(category, items))
    }
}

/// Unique categories in canonical order.
fn dedup(ids: &[CategoryId]) -> Vec<CategoryId> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}
