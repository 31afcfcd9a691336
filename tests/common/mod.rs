//! Scripted [`ResourceClient`] shared by the integration tests.
//!
//! Each category gets a fixed latency and reply. The client records how
//! many fetches started, how many ran to completion, how many are still
//! in flight (a dropped fetch counts as no longer in flight), and the order
//! in which fetches completed.

#![allow(dead_code)]

use async_trait::async_trait;
use chartfeed::feed::{
    descriptor_for, expected_kinds, CategoryId, FeedEnvelope, FetchError, RequestDescriptor,
    ResourceClient,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    /// A feed with one result per id, all of the category's expected kind
    Items(Vec<&'static str>),
    /// A non-2xx response
    Status(u16),
    /// `{}`: no feed object at all
    NoFeed,
    /// A 2xx body that is not a feed
    Malformed,
}

#[derive(Default)]
pub struct ScriptedClient {
    script: HashMap<CategoryId, (Duration, Reply)>,
    started: AtomicUsize,
    finished: AtomicUsize,
    in_flight: AtomicUsize,
    completion_order: Mutex<Vec<CategoryId>>,
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, category: CategoryId, latency_ms: u64, reply: Reply) -> Self {
        self.script
            .insert(category, (Duration::from_millis(latency_ms), reply));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn completion_order(&self) -> Vec<CategoryId> {
        self.completion_order.lock().unwrap().clone()
    }
}

fn category_of(descriptor: &RequestDescriptor) -> CategoryId {
    CategoryId::ALL
        .into_iter()
        .find(|id| descriptor_for(*id) == *descriptor)
        .expect("descriptor does not belong to any category")
}

fn feed_with(category: CategoryId, ids: &[&str]) -> FeedEnvelope {
    let results: Vec<_> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "name": format!("{category} {id}"),
                "kind": expected_kinds(category)[0],
                "artworkUrl100": format!("https://img.test/{id}/100x100bb.jpg"),
                "url": format!("https://store.test/{category}/{id}"),
            })
        })
        .collect();

    serde_json::from_value(serde_json::json!({ "feed": { "results": results } })).unwrap()
}

#[async_trait]
impl ResourceClient for ScriptedClient {
    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<FeedEnvelope, FetchError> {
        let category = category_of(descriptor);
        self.started.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        let (latency, reply) = self
            .script
            .get(&category)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::Items(Vec::new())));

        tokio::time::sleep(latency).await;
        self.completion_order.lock().unwrap().push(category);
        self.finished.fetch_add(1, Ordering::SeqCst);

        match reply {
            Reply::Items(ids) => Ok(feed_with(category, &ids)),
            Reply::Status(status) => Err(FetchError::UnsuccessfulResponse {
                url: format!("https://charts.test/{}", descriptor.media_type),
                status,
            }),
            Reply::NoFeed => Ok(serde_json::from_str("{}").unwrap()),
            Reply::Malformed => Err(FetchError::Decode {
                url: format!("https://charts.test/{}", descriptor.media_type),
                source: serde_json::from_str::<FeedEnvelope>("[1, 2").unwrap_err(),
            }),
        }
    }
}
