//! Typed collection handle with cursor pagination
//!
//! A store handle plus a collection address, with the record's converter
//! applied on every read and write.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::db::schemas::{patch_fields, Schema};
use crate::db::store::{CollectionPath, DocumentStore, OrderBy, Query, Snapshot, WriteMode};
use crate::error::StoreError;

/// One page of an ordered scan
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Id of the last item when the page came back full, the cursor for the
    /// next call. `None` marks the end of the collection.
    #[serde(rename = "lastId")]
    pub last_id: Option<String>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            last_id: None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.last_id.is_some()
    }
}

pub struct TypedCollection<T> {
    store: Arc<dyn DocumentStore>,
    path: CollectionPath,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Schema> TypedCollection<T> {
    pub fn new(store: Arc<dyn DocumentStore>, path: CollectionPath) -> Self {
        Self {
            store,
            path,
            _record: PhantomData,
        }
    }

    /// Every document, fully materialized, in the given order
    pub async fn list_ordered(&self, order: &OrderBy) -> Result<Vec<T>, StoreError> {
        let query = Query::order_by(order.field.clone(), order.direction);
        let docs = self.store.query(&self.path, &query).await?;
        Ok(docs.iter().map(|doc| T::from_wire(&doc.id, &doc.data)).collect())
    }

    /// One page of the ordered scan, resuming strictly after `cursor`.
    ///
    /// An empty cursor means the first page. A cursor naming a document that
    /// does not exist yields an empty page with no continuation, as does
    /// `page_size == 0`.
    pub async fn page(
        &self,
        order: &OrderBy,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page<T>, StoreError> {
        if page_size == 0 {
            return Ok(Page::empty());
        }

        let mut query = Query::order_by(order.field.clone(), order.direction).limit(page_size);
        if let Some(cursor_id) = cursor.filter(|id| !id.is_empty()) {
            match self.find(cursor_id).await? {
                Some(cursor_doc) => query = query.start_after(cursor_doc),
                None => {
                    debug!(collection = %self.path, cursor = %cursor_id, "Cursor document gone, ending scan");
                    return Ok(Page::empty());
                }
            }
        }

        let docs = self.store.query(&self.path, &query).await?;
        let last_id = if docs.len() == page_size {
            docs.last().map(|doc| doc.id.clone())
        } else {
            None
        };
        let items: Vec<T> = docs.iter().map(|doc| T::from_wire(&doc.id, &doc.data)).collect();

        debug!(
            collection = %self.path,
            count = items.len(),
            has_more = last_id.is_some(),
            "Fetched page"
        );
        Ok(Page { items, last_id })
    }

    /// Create with converter defaults; returns the store-assigned id
    pub async fn insert(&self, record: &T) -> Result<String, StoreError> {
        self.store.add(&self.path, record.to_wire()).await
    }

    /// Point read of the raw snapshot. An id that cannot name a document
    /// (empty, or containing `/`) is simply absent.
    async fn find(&self, id: &str) -> Result<Option<Snapshot>, StoreError> {
        match self.path.doc(id) {
            Ok(doc) => self.store.get(&doc).await,
            Err(StoreError::InvalidPath(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        let snapshot = self.find(id).await?;
        Ok(snapshot.map(|doc| T::from_wire(&doc.id, &doc.data)))
    }

    /// Merge only the fields set on `patch`
    pub async fn update<P: Serialize>(&self, id: &str, patch: &P) -> Result<(), StoreError> {
        let fields = patch_fields(patch)?;
        self.store.update(&self.path.doc(id)?, fields).await
    }

    /// Deep-merge `patch`, creating the document if needed
    pub async fn upsert<P: Serialize>(&self, id: &str, patch: &P) -> Result<(), StoreError> {
        let fields = patch_fields(patch)?;
        self.store
            .set(&self.path.doc(id)?, fields, WriteMode::Merge)
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(&self.path.doc(id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{World, WorldPatch};
    use crate::db::store::{Direction, MemoryStore};

    fn worlds() -> TypedCollection<World> {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        TypedCollection::new(store, CollectionPath::new(["worlds"]).unwrap())
    }

    fn by_order() -> OrderBy {
        OrderBy {
            field: "orderId".into(),
            direction: Direction::Ascending,
        }
    }

    #[tokio::test]
    async fn test_page_walk_without_gaps() {
        let worlds = worlds();
        for i in 0..7 {
            worlds.insert(&World::new(format!("w{}", i), "", i)).await.unwrap();
        }

        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = worlds.page(&by_order(), 3, cursor.as_deref()).await.unwrap();
            seen.extend(page.items.iter().map(|w| w.order_id));
            if !page.has_more() {
                break;
            }
            cursor = page.last_id;
        }
        assert_eq!(seen, (0..7).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_zero_page_size_and_missing_cursor() {
        let worlds = worlds();
        worlds.insert(&World::new("a", "", 0)).await.unwrap();

        assert_eq!(worlds.page(&by_order(), 0, None).await.unwrap(), Page::empty());
        assert_eq!(
            worlds.page(&by_order(), 5, Some("missing")).await.unwrap(),
            Page::empty()
        );
    }

    #[tokio::test]
    async fn test_unaddressable_ids_read_as_absent() {
        let worlds = worlds();
        worlds.insert(&World::new("a", "", 0)).await.unwrap();

        assert_eq!(worlds.get("").await.unwrap(), None);
        assert_eq!(worlds.get("a/b").await.unwrap(), None);
        assert_eq!(
            worlds.page(&by_order(), 5, Some("a/b")).await.unwrap(),
            Page::empty()
        );

        let first = worlds.page(&by_order(), 5, Some("")).await.unwrap();
        assert_eq!(first.items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_propagates() {
        let worlds = worlds();
        let patch = WorldPatch {
            img: Some("x".into()),
            ..Default::default()
        };
        let err = worlds.update("nope", &patch).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
