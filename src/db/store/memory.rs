//! In-process document store
//!
//! Each collection path maps to its documents keyed by id, so store-default
//! order is ascending id. Subcollections live under their own path key and
//! are unaffected when the parent document is deleted.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    apply_update, generate_id, merge_deep, resolve_sentinels, CollectionPath, DocPath,
    DocumentStore, Fields, Snapshot, Timestamp, WriteMode,
};
use crate::error::StoreError;

type Collection = BTreeMap<String, Fields>;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn commit(mut data: Fields) -> Fields {
    resolve_sentinels(&mut data, &Timestamp::now().to_wire());
    data
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Snapshot>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&path.parent().key())
            .and_then(|docs| docs.get(path.id()))
            .map(|data| Snapshot::new(path.id(), data.clone())))
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Snapshot>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection.key())
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Snapshot::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add(&self, collection: &CollectionPath, data: Fields) -> Result<String, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.key()).or_default();
        let mut id = generate_id();
        while docs.contains_key(&id) {
            id = generate_id();
        }
        docs.insert(id.clone(), commit(data));
        debug!(collection = %collection, id = %id, "Added document");
        Ok(id)
    }

    async fn set(&self, path: &DocPath, data: Fields, mode: WriteMode) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(path.parent().key()).or_default();
        let data = commit(data);
        match (mode, docs.get_mut(path.id())) {
            (WriteMode::Merge, Some(existing)) => merge_deep(existing, data),
            _ => {
                docs.insert(path.id().to_string(), data);
            }
        }
        debug!(path = %path, ?mode, "Set document");
        Ok(())
    }

    async fn update(&self, path: &DocPath, data: Fields) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(&path.parent().key())
            .and_then(|docs| docs.get_mut(path.id()))
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        apply_update(existing, commit(data));
        debug!(path = %path, "Updated document");
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(&path.parent().key()) {
            if docs.remove(path.id()).is_some() {
                debug!(path = %path, "Deleted document");
            }
        }
        Ok(())
    }
}
