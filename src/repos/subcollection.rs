//! Path-addressed access to free-form documents
//!
//! One accessor serves every nesting shape (`worlds/{id}/games`,
//! `users/{id}/Profiles`, `langs`) without per-shape schemas. Records carry
//! their id merged into the body; a stored `id` field never exists because
//! payload `id` keys are dropped on write.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::db::store::{CollectionPath, DocumentStore, Fields, Snapshot, WriteMode};
use crate::error::StoreError;

/// Untyped document with its id
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GenericRecord {
    pub id: String,
    #[serde(flatten)]
    pub data: Fields,
}

impl GenericRecord {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut data = snapshot.data;
        data.remove("id");
        Self {
            id: snapshot.id,
            data,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

fn without_id(mut payload: Fields) -> Fields {
    payload.remove("id");
    payload
}

#[derive(Clone)]
pub struct SubcollectionAccessor {
    store: Arc<dyn DocumentStore>,
}

impl SubcollectionAccessor {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every document under `path`, in store-default order
    pub async fn list<S: AsRef<str>>(&self, path: &[S]) -> Result<Vec<GenericRecord>, StoreError> {
        let collection = CollectionPath::new(path)?;
        let docs = self.store.list(&collection).await?;
        debug!(collection = %collection, count = docs.len(), "Listed documents");
        Ok(docs.into_iter().map(GenericRecord::from_snapshot).collect())
    }

    /// Create under a store-generated id
    pub async fn create<S: AsRef<str>>(
        &self,
        path: &[S],
        payload: Fields,
    ) -> Result<String, StoreError> {
        let collection = CollectionPath::new(path)?;
        let id = self.store.add(&collection, without_id(payload)).await?;
        info!(collection = %collection, id = %id, "Created document");
        Ok(id)
    }

    /// Write under a caller-chosen id.
    ///
    /// An existing document with that id is fully overwritten, not merged.
    pub async fn create_with_id<S: AsRef<str>>(
        &self,
        path: &[S],
        id: &str,
        payload: Fields,
    ) -> Result<(), StoreError> {
        let doc = CollectionPath::new(path)?.doc(id)?;
        self.store
            .set(&doc, without_id(payload), WriteMode::Overwrite)
            .await?;
        info!(path = %doc, "Wrote document");
        Ok(())
    }

    /// Partial merge into an existing document
    pub async fn update<S: AsRef<str>>(
        &self,
        path: &[S],
        id: &str,
        payload: Fields,
    ) -> Result<(), StoreError> {
        let doc = CollectionPath::new(path)?.doc(id)?;
        self.store.update(&doc, without_id(payload)).await
    }

    pub async fn remove<S: AsRef<str>>(&self, path: &[S], id: &str) -> Result<(), StoreError> {
        let doc = CollectionPath::new(path)?.doc(id)?;
        self.store.delete(&doc).await?;
        info!(path = %doc, "Removed document");
        Ok(())
    }

    pub async fn get<S: AsRef<str>>(
        &self,
        path: &[S],
        id: &str,
    ) -> Result<Option<GenericRecord>, StoreError> {
        let collection = CollectionPath::new(path)?;
        // An id that cannot name a document reads as absent
        let Ok(doc) = collection.doc(id) else {
            return Ok(None);
        };
        Ok(self.store.get(&doc).await?.map(GenericRecord::from_snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MemoryStore;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn accessor() -> SubcollectionAccessor {
        SubcollectionAccessor::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_with_id_overwrites() {
        let docs = accessor();
        let games = ["worlds", "w1", "games"];

        docs.create_with_id(&games, "custom-1", fields(json!({ "a": 1, "b": true })))
            .await
            .unwrap();
        docs.create_with_id(&games, "custom-1", fields(json!({ "a": 2 })))
            .await
            .unwrap();

        let record = docs.get(&games, "custom-1").await.unwrap().unwrap();
        assert_eq!(Value::Object(record.data), json!({ "a": 2 }));
    }

    #[tokio::test]
    async fn test_update_merges() {
        let docs = accessor();
        let profiles = ["users", "u1", "Profiles"];
        let id = docs
            .create(&profiles, fields(json!({ "name": "Dana", "age": 7 })))
            .await
            .unwrap();

        docs.update(&profiles, &id, fields(json!({ "age": 8 }))).await.unwrap();

        let record = docs.get(&profiles, &id).await.unwrap().unwrap();
        assert_eq!(record.get("name"), Some(&json!("Dana")));
        assert_eq!(record.get("age"), Some(&json!(8)));
    }

    #[tokio::test]
    async fn test_record_id_merged_and_payload_id_dropped() {
        let docs = accessor();
        let id = docs
            .create(&["langs"], fields(json!({ "id": "spoof", "code": "he" })))
            .await
            .unwrap();

        let listed = docs.list(&["langs"]).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].get("id"), None);

        let merged = serde_json::to_value(&listed[0]).unwrap();
        assert_eq!(merged, json!({ "id": id, "code": "he" }));
    }

    #[tokio::test]
    async fn test_invalid_paths_rejected() {
        let docs = accessor();
        let err = docs.list(&["worlds", "w1"]).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
        let err = docs.get(&["worlds", "w1"], "g1").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
        assert!(docs.get(&["langs"], "").await.unwrap().is_none());
        assert!(docs.get(&["langs"], "a/b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_get_is_none_and_remove_is_idempotent() {
        let docs = accessor();
        let games = vec!["worlds".to_string(), "w1".to_string(), "games".to_string()];
        assert!(docs.get(&games, "nope").await.unwrap().is_none());
        docs.remove(&games, "nope").await.unwrap();
        docs.remove(&games, "nope").await.unwrap();
    }
}
