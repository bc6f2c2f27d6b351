//! Raw stored documents and change-feed events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A stored document: its persistence id plus loosely typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self { id: id.into(), fields }
    }

    /// Build from a JSON object. Non-objects become an empty document.
    pub fn from_value(id: impl Into<String>, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// State of a collection's change feed.
///
/// Every snapshot carries the full collection, never a delta.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// The complete current contents of the collection
    Snapshot(Arc<Vec<RawDocument>>),
    /// The feed broke; earlier snapshots may still be valid
    Error(String),
}

impl FeedEvent {
    pub fn snapshot(docs: Vec<RawDocument>) -> Self {
        FeedEvent::Snapshot(Arc::new(docs))
    }
}
