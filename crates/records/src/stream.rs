//! Live, normalized view of a clinic collection.
//!
//! A background task turns every [`FeedEvent`] into a [`ClinicView`]. Each
//! published view is built from one complete snapshot, so consumers never
//! see a half-applied update. A feed error keeps the last good clinics and
//! marks the view stale.

use crate::clinic::{normalize_snapshot, ClinicRecord};
use crate::document::FeedEvent;
use crate::error::StoreResult;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use clinicfinder_geo::BoundingBox;
use clinicfinder_telemetry::{metrics, names};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What subscribers see.
#[derive(Debug, Clone, Default)]
pub struct ClinicView {
    /// Normalized clinics in stored order
    pub clinics: Arc<Vec<ClinicRecord>>,
    /// Documents dropped from the latest snapshot
    pub dropped: usize,
    /// Set while the feed is in an error state
    pub error: Option<String>,
    /// When the clinics were last replaced; `None` before the first snapshot
    pub updated_at: Option<DateTime<Utc>>,
    /// Increments with every published view
    pub revision: u64,
}

impl ClinicView {
    /// True when the clinics may be out of date because the feed failed.
    pub fn is_stale(&self) -> bool {
        self.error.is_some()
    }

    /// True once a snapshot has been delivered.
    pub fn is_loaded(&self) -> bool {
        self.updated_at.is_some()
    }
}

/// Stops the background task when dropped.
#[derive(Debug)]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    fn new(handle: JoinHandle<()>) -> Self {
        Self { handle: Some(handle) }
    }

    /// Stop receiving updates.
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    /// True while the feed task is still running.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A live clinic list backed by a store subscription.
///
/// Must be opened inside a Tokio runtime.
pub struct ClinicStream {
    views: watch::Receiver<ClinicView>,
    subscription: Subscription,
}

impl ClinicStream {
    /// Subscribe to `collection` and normalize against `region`.
    pub fn open<S>(store: &S, collection: &str, region: BoundingBox) -> StoreResult<Self>
    where
        S: DocumentStore + ?Sized,
    {
        let feed = store.subscribe(collection)?;
        let (tx, views) = watch::channel(ClinicView::default());
        let handle = tokio::spawn(run_feed(feed, region, move |view| {
            tx.send_replace(view);
        }));
        Ok(Self {
            views,
            subscription: Subscription::new(handle),
        })
    }

    /// Invoke `callback` with every new view until the subscription is dropped.
    pub fn subscribe_with<S, F>(store: &S, collection: &str, region: BoundingBox, mut callback: F) -> StoreResult<Subscription>
    where
        S: DocumentStore + ?Sized,
        F: FnMut(&ClinicView) + Send + 'static,
    {
        let feed = store.subscribe(collection)?;
        let handle = tokio::spawn(run_feed(feed, region, move |view| callback(&view)));
        Ok(Subscription::new(handle))
    }

    /// The latest view.
    pub fn current(&self) -> ClinicView {
        self.views.borrow().clone()
    }

    /// Wait for the next view. `None` once the feed has ended.
    pub async fn changed(&mut self) -> Option<ClinicView> {
        self.views.changed().await.ok()?;
        Some(self.views.borrow_and_update().clone())
    }

    /// Wait until the first snapshot has been applied.
    pub async fn loaded(&mut self) -> Option<ClinicView> {
        self.views
            .wait_for(|view| view.is_loaded() || view.is_stale())
            .await
            .ok()
            .map(|view| view.clone())
    }

    /// Stop receiving updates.
    pub fn unsubscribe(self) {
        self.subscription.unsubscribe();
    }
}

async fn run_feed<F>(mut feed: watch::Receiver<FeedEvent>, region: BoundingBox, mut publish: F)
where
    F: FnMut(ClinicView),
{
    let mut view = ClinicView::default();
    loop {
        let event = feed.borrow_and_update().clone();
        view = apply(&view, event, &region);
        publish(view.clone());
        if feed.changed().await.is_err() {
            debug!("clinic feed closed");
            break;
        }
    }
}

fn apply(current: &ClinicView, event: FeedEvent, region: &BoundingBox) -> ClinicView {
    match event {
        FeedEvent::Snapshot(docs) => {
            let (clinics, dropped) = normalize_snapshot(&docs, region);
            if dropped > 0 {
                debug!(dropped, total = docs.len(), "snapshot had unusable records");
            }
            metrics().increment_by(names::RECORDS_DROPPED, dropped as u64);
            metrics().increment(names::RECORDS_PUBLISHED);
            ClinicView {
                clinics: Arc::new(clinics),
                dropped,
                error: None,
                updated_at: Some(Utc::now()),
                revision: current.revision + 1,
            }
        }
        FeedEvent::Error(message) => {
            warn!(error = %message, "clinic feed error, keeping last snapshot");
            ClinicView {
                error: Some(message),
                revision: current.revision + 1,
                ..current.clone()
            }
        }
    }
}
