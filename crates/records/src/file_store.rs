//! JSON file-backed store.
//!
//! The file holds one collection, either as an array of documents carrying
//! an `id` field or as an object mapping ids to documents. With
//! [`JsonFileStore::watch`] the file is reloaded whenever it changes and
//! subscribers receive a fresh snapshot; a failed reload is published as a
//! feed error and the previous documents stay in place.

use crate::document::{FeedEvent, RawDocument};
use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, MemoryStore};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Store backed by a JSON export on disk.
pub struct JsonFileStore {
    path: PathBuf,
    collection: String,
    inner: Arc<MemoryStore>,
    watcher: Option<RecommendedWatcher>,
}

impl JsonFileStore {
    /// Load `path` as `collection`. Fails if the file is unreadable or malformed.
    pub fn open(path: impl AsRef<Path>, collection: impl Into<String>) -> StoreResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            collection: collection.into(),
            inner: Arc::new(MemoryStore::new()),
            watcher: None,
        };
        let count = reload_into(&store.inner, &store.path, &store.collection)?;
        info!(path = %store.path.display(), count, "loaded clinic documents");
        Ok(store)
    }

    /// Start reloading on file changes.
    ///
    /// The parent directory is watched so editors that replace the file
    /// by rename are picked up.
    pub fn watch(mut self) -> StoreResult<Self> {
        let inner = Arc::clone(&self.inner);
        let path = self.path.clone();
        let collection = self.collection.clone();
        let file_name = path.file_name().map(|n| n.to_os_string());

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let relevant = matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) && event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if !relevant {
                    return;
                }
                match reload_into(&inner, &path, &collection) {
                    Ok(count) => debug!(path = %path.display(), count, "reloaded clinic documents"),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "reload failed");
                        inner.fail(&collection, e.to_string());
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "file watcher error");
                inner.fail(&collection, e.to_string());
            }
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);
        Ok(self)
    }

    /// Re-read the file now. On failure subscribers see a feed error.
    pub fn reload(&self) -> StoreResult<usize> {
        reload_into(&self.inner, &self.path, &self.collection).inspect_err(|e| {
            self.inner.fail(&self.collection, e.to_string());
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    fn check_collection(&self, collection: &str) -> StoreResult<()> {
        if collection == self.collection {
            Ok(())
        } else {
            Err(StoreError::Subscription(format!(
                "{} holds collection '{}', not '{}'",
                self.path.display(),
                self.collection,
                collection
            )))
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn subscribe(&self, collection: &str) -> StoreResult<watch::Receiver<FeedEvent>> {
        self.check_collection(collection)?;
        self.inner.subscribe(collection)
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<RawDocument>> {
        self.check_collection(collection)?;
        self.inner.get(collection, id)
    }

    fn find_by_field(&self, collection: &str, field: &str, value: &Value) -> StoreResult<Vec<RawDocument>> {
        self.check_collection(collection)?;
        self.inner.find_by_field(collection, field, value)
    }
}

fn reload_into(store: &MemoryStore, path: &Path, collection: &str) -> StoreResult<usize> {
    let content = std::fs::read_to_string(path)?;
    let docs = parse_documents(&content)?;
    let count = docs.len();
    store.replace_all(collection, docs);
    Ok(count)
}

/// Parse an export into documents.
///
/// Array entries without an `id` are skipped.
pub fn parse_documents(content: &str) -> StoreResult<Vec<RawDocument>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let id = match item.get("id") {
                    Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => {
                        warn!(index, "skipping document without id");
                        return None;
                    }
                };
                Some(RawDocument::from_value(id, item))
            })
            .collect()),
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(id, value)| RawDocument::from_value(id, value))
            .collect()),
        other => Err(StoreError::Layout(format!(
            "expected an array or object of documents, found {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_array_layout() {
        let docs = parse_documents(r#"[{"id": "a", "name": "A"}, {"id": 7}, {"name": "no id"}]"#).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "7"]);
        assert_eq!(docs[0].get("name"), Some(&Value::from("A")));
    }

    #[test]
    fn test_parse_object_layout() {
        let docs = parse_documents(r#"{"a": {"name": "A"}, "b": {"name": "B"}}"#).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        assert!(matches!(parse_documents("42"), Err(StoreError::Layout(_))));
        assert!(matches!(parse_documents("[oops"), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_open_and_lookup() {
        let file = write_file(r#"[{"id": "a", "slug": "alpha"}]"#);
        let store = JsonFileStore::open(file.path(), "clinics").unwrap();
        assert!(store.get("clinics", "a").unwrap().is_some());
        assert_eq!(store.find_by_field("clinics", "slug", &Value::from("alpha")).unwrap().len(), 1);
        assert!(store.get("other", "a").is_err());
        assert!(!store.is_watching());
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            JsonFileStore::open("/definitely/not/here.json", "clinics"),
            Err(StoreError::Io(_))
        ));
    }

    #[test]
    fn test_failed_reload_keeps_documents_and_reports_error() {
        let file = write_file(r#"[{"id": "a"}]"#);
        let store = JsonFileStore::open(file.path(), "clinics").unwrap();
        let rx = store.subscribe("clinics").unwrap();

        std::fs::write(file.path(), "not json").unwrap();
        assert!(store.reload().is_err());
        assert!(matches!(&*rx.borrow(), FeedEvent::Error(_)));
        assert!(store.get("clinics", "a").unwrap().is_some());

        std::fs::write(file.path(), r#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
        assert_eq!(store.reload().unwrap(), 2);
        assert!(matches!(&*rx.borrow(), FeedEvent::Snapshot(docs) if docs.len() == 2));
    }
}
