//! Document store contract and the in-memory store.

use crate::clinic::ClinicRecord;
use crate::document::{FeedEvent, RawDocument};
use crate::error::{StoreError, StoreResult};
use clinicfinder_geo::BoundingBox;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};
use tokio::sync::watch;

/// Anything that holds clinic documents and can push collection snapshots.
pub trait DocumentStore: Send + Sync {
    /// Watch a collection.
    ///
    /// The receiver always holds the latest [`FeedEvent`]; intermediate
    /// snapshots may be skipped by slow consumers.
    fn subscribe(&self, collection: &str) -> StoreResult<watch::Receiver<FeedEvent>>;

    /// Fetch one document by id.
    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<RawDocument>>;

    /// Documents whose `field` equals `value` exactly.
    fn find_by_field(&self, collection: &str, field: &str, value: &Value) -> StoreResult<Vec<RawDocument>>;
}

/// Resolve a clinic by id, then by `slug`, then by `legacyId`.
///
/// A purely numeric key also matches a numeric `legacyId`.
pub fn find_clinic<S>(store: &S, collection: &str, key: &str, region: &BoundingBox) -> StoreResult<Option<ClinicRecord>>
where
    S: DocumentStore + ?Sized,
{
    let key = key.trim();
    if key.is_empty() {
        return Ok(None);
    }

    let doc = match store.get(collection, key)? {
        Some(doc) => Some(doc),
        None => find_first(store, collection, "slug", key)?,
    };
    let doc = match doc {
        Some(doc) => Some(doc),
        None => find_first(store, collection, "legacyId", key)?,
    };

    match doc {
        Some(doc) => Ok(Some(ClinicRecord::from_document(&doc, region)?)),
        None => Ok(None),
    }
}

fn find_first<S>(store: &S, collection: &str, field: &str, key: &str) -> StoreResult<Option<RawDocument>>
where
    S: DocumentStore + ?Sized,
{
    let mut candidates = vec![Value::String(key.to_string())];
    if let Ok(n) = key.parse::<i64>() {
        candidates.push(Value::from(n));
    }

    for value in &candidates {
        if let Some(doc) = store.find_by_field(collection, field, value)?.into_iter().next() {
            return Ok(Some(doc));
        }
    }
    Ok(None)
}

struct Collection {
    docs: BTreeMap<String, Map<String, Value>>,
    feed: watch::Sender<FeedEvent>,
}

impl Collection {
    fn new() -> Self {
        let (feed, _) = watch::channel(FeedEvent::snapshot(Vec::new()));
        Self { docs: BTreeMap::new(), feed }
    }

    fn publish(&self) {
        let snapshot = self
            .docs
            .iter()
            .map(|(id, fields)| RawDocument::new(id.clone(), fields.clone()))
            .collect();
        self.feed.send_replace(FeedEvent::snapshot(snapshot));
    }
}

/// Thread-safe in-memory store.
///
/// Every mutation republishes the full collection to its subscribers.
/// Documents are kept ordered by id.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collection<R>(&self, collection: &str, f: impl FnOnce(&mut Collection) -> R) -> R {
        let mut collections = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        let entry = collections
            .entry(collection.to_string())
            .or_insert_with(Collection::new);
        f(entry)
    }

    /// Insert or replace a document.
    pub fn upsert(&self, collection: &str, id: impl Into<String>, fields: Map<String, Value>) {
        self.with_collection(collection, |c| {
            c.docs.insert(id.into(), fields);
            c.publish();
        });
    }

    /// Insert a document under a freshly generated id.
    pub fn insert(&self, collection: &str, fields: Map<String, Value>) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.upsert(collection, id.clone(), fields);
        id
    }

    /// Remove a document. Returns whether it existed.
    pub fn delete(&self, collection: &str, id: &str) -> bool {
        self.with_collection(collection, |c| {
            let existed = c.docs.remove(id).is_some();
            if existed {
                c.publish();
            }
            existed
        })
    }

    /// Replace the whole collection in one snapshot.
    pub fn replace_all(&self, collection: &str, docs: impl IntoIterator<Item = RawDocument>) {
        self.with_collection(collection, |c| {
            c.docs = docs.into_iter().map(|d| (d.id, d.fields)).collect();
            c.publish();
        });
    }

    /// Push a feed error to subscribers. Stored documents are untouched.
    pub fn fail(&self, collection: &str, message: impl Into<String>) {
        self.with_collection(collection, |c| {
            c.feed.send_replace(FeedEvent::Error(message.into()));
        });
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .map_or(0, |c| c.docs.len())
    }
}

impl DocumentStore for MemoryStore {
    fn subscribe(&self, collection: &str) -> StoreResult<watch::Receiver<FeedEvent>> {
        Ok(self.with_collection(collection, |c| c.feed.subscribe()))
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<RawDocument>> {
        let collections = self.collections.read().map_err(|e| StoreError::Subscription(e.to_string()))?;
        Ok(collections
            .get(collection)
            .and_then(|c| c.docs.get(id))
            .map(|fields| RawDocument::new(id, fields.clone())))
    }

    fn find_by_field(&self, collection: &str, field: &str, value: &Value) -> StoreResult<Vec<RawDocument>> {
        let collections = self.collections.read().map_err(|e| StoreError::Subscription(e.to_string()))?;
        Ok(collections
            .get(collection)
            .map(|c| {
                c.docs
                    .iter()
                    .filter(|(_, fields)| fields.get(field) == Some(value))
                    .map(|(id, fields)| RawDocument::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const REGION: BoundingBox = BoundingBox::CONTINENTAL_US;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.upsert("clinics", "id-1", fields(json!({"name": "One", "coords": [42.3, -83.0], "slug": "one"})));
        store.upsert("clinics", "id-2", fields(json!({"name": "Two", "coords": [42.4, -83.1], "legacyId": 42})));
        store.upsert("clinics", "id-3", fields(json!({"name": "Three", "coords": [42.5, -83.2], "legacyId": "L-7"})));
        store
    }

    #[test]
    fn test_find_clinic_by_id_slug_and_legacy_id() {
        let store = seeded();
        let by_id = find_clinic(&store, "clinics", "id-1", &REGION).unwrap().unwrap();
        assert_eq!(by_id.name, "One");

        let by_slug = find_clinic(&store, "clinics", "one", &REGION).unwrap().unwrap();
        assert_eq!(by_slug.id, "id-1");

        let by_numeric_legacy = find_clinic(&store, "clinics", "42", &REGION).unwrap().unwrap();
        assert_eq!(by_numeric_legacy.id, "id-2");

        let by_text_legacy = find_clinic(&store, "clinics", "L-7", &REGION).unwrap().unwrap();
        assert_eq!(by_text_legacy.id, "id-3");
    }

    #[test]
    fn test_find_clinic_missing() {
        let store = seeded();
        assert!(find_clinic(&store, "clinics", "nope", &REGION).unwrap().is_none());
        assert!(find_clinic(&store, "clinics", "  ", &REGION).unwrap().is_none());
        assert!(find_clinic(&store, "other", "id-1", &REGION).unwrap().is_none());
    }

    #[test]
    fn test_find_clinic_malformed() {
        let store = seeded();
        store.upsert("clinics", "bad", fields(json!({"name": "No coords"})));
        let err = find_clinic(&store, "clinics", "bad", &REGION).unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn test_subscribe_sees_latest_snapshot() {
        let store = seeded();
        let rx = store.subscribe("clinics").unwrap();
        match &*rx.borrow() {
            FeedEvent::Snapshot(docs) => assert_eq!(docs.len(), 3),
            other => panic!("unexpected event {other:?}"),
        }

        assert!(store.delete("clinics", "id-2"));
        assert!(!store.delete("clinics", "id-2"));
        match &*rx.borrow() {
            FeedEvent::Snapshot(docs) => assert_eq!(docs.len(), 2),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_fail_publishes_error_without_dropping_docs() {
        let store = seeded();
        let rx = store.subscribe("clinics").unwrap();
        store.fail("clinics", "connection reset");
        assert!(matches!(&*rx.borrow(), FeedEvent::Error(msg) if msg == "connection reset"));
        assert_eq!(store.len("clinics"), 3);
    }

    #[test]
    fn test_insert_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = store.insert("clinics", Map::new());
        let b = store.insert("clinics", Map::new());
        assert_ne!(a, b);
        assert_eq!(store.len("clinics"), 2);
    }
}
