//! Embedded persistent document store
//!
//! One sled tree per collection path (`worlds/{id}/games` is its own tree),
//! documents keyed by id with JSON bodies. Read-modify-write paths retry a
//! compare-and-swap so each document write stays atomic.

use std::path::Path;

use async_trait::async_trait;
use sled::{Db, Tree};
use tracing::{debug, info};

use super::{
    apply_update, generate_id, merge_deep, resolve_sentinels, take_ordered, CollectionPath,
    DocPath, DocumentStore, Fields, Query, Snapshot, Timestamp, WriteMode,
};
use crate::error::StoreError;

pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open or create the store
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "Opened document store");
        Ok(Self { db })
    }

    /// Tree for a collection, created on first write
    fn tree(&self, collection: &CollectionPath) -> Result<Tree, StoreError> {
        Ok(self.db.open_tree(collection.key())?)
    }

    /// Tree for a collection on read paths; a collection never written to
    /// has no tree and reads as empty
    fn existing_tree(&self, collection: &CollectionPath) -> Result<Option<Tree>, StoreError> {
        let key = collection.key();
        let exists = self
            .db
            .tree_names()
            .iter()
            .any(|name| {
                let name: &[u8] = name;
                name == key.as_bytes()
            });
        if exists {
            Ok(Some(self.db.open_tree(key)?))
        } else {
            Ok(None)
        }
    }

    /// Decode every document of a collection that `keep` accepts
    fn scan<F>(&self, collection: &CollectionPath, keep: F) -> Result<Vec<Snapshot>, StoreError>
    where
        F: Fn(&Snapshot) -> bool,
    {
        let Some(tree) = self.existing_tree(collection)? else {
            return Ok(Vec::new());
        };
        let mut docs = Vec::new();
        for item in tree.iter() {
            let (key, value) = item?;
            let doc = Snapshot::new(decode_id(&key)?, decode(&value)?);
            if keep(&doc) {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    async fn flush(&self) -> Result<(), StoreError> {
        self.db.flush_async().await?;
        Ok(())
    }

    /// Atomically replace a document with `f(current)`
    fn modify<F>(&self, path: &DocPath, f: F) -> Result<(), StoreError>
    where
        F: Fn(Option<Fields>) -> Result<Fields, StoreError>,
    {
        let tree = self.tree(path.parent())?;
        let key = path.id().as_bytes();
        loop {
            let current = tree.get(key)?;
            let decoded = current.as_ref().map(|bytes| decode(bytes)).transpose()?;
            let next = encode(&f(decoded)?)?;
            match tree.compare_and_swap(key, current, Some(next))? {
                Ok(()) => return Ok(()),
                Err(_) => debug!(path = %path, "Concurrent write, retrying"),
            }
        }
    }
}

fn encode(data: &Fields) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec(data)?)
}

fn decode(bytes: &[u8]) -> Result<Fields, StoreError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn decode_id(key: &[u8]) -> Result<String, StoreError> {
    String::from_utf8(key.to_vec())
        .map_err(|e| StoreError::Internal(format!("Non UTF-8 document id: {}", e)))
}

fn commit(mut data: Fields) -> Fields {
    resolve_sentinels(&mut data, &Timestamp::now().to_wire());
    data
}

#[async_trait]
impl DocumentStore for SledStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Snapshot>, StoreError> {
        let Some(tree) = self.existing_tree(path.parent())? else {
            return Ok(None);
        };
        match tree.get(path.id().as_bytes())? {
            Some(bytes) => Ok(Some(Snapshot::new(path.id(), decode(&bytes)?))),
            None => Ok(None),
        }
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Snapshot>, StoreError> {
        self.scan(collection, |_| true)
    }

    /// Documents before the cursor are dropped as they are decoded, and only
    /// the first `limit` of the rest are sorted
    async fn query(
        &self,
        collection: &CollectionPath,
        query: &Query,
    ) -> Result<Vec<Snapshot>, StoreError> {
        let docs = self.scan(collection, |doc| query.admits(doc))?;
        debug!(collection = %collection, candidates = docs.len(), "Evaluating query");
        Ok(take_ordered(docs, query))
    }

    async fn add(&self, collection: &CollectionPath, data: Fields) -> Result<String, StoreError> {
        let tree = self.tree(collection)?;
        let bytes = encode(&commit(data))?;
        let id = loop {
            let id = generate_id();
            // Insert only if the id is still free
            if tree
                .compare_and_swap(id.as_bytes(), None as Option<&[u8]>, Some(bytes.clone()))?
                .is_ok()
            {
                break id;
            }
        };
        self.flush().await?;
        debug!(collection = %collection, id = %id, "Added document");
        Ok(id)
    }

    async fn set(&self, path: &DocPath, data: Fields, mode: WriteMode) -> Result<(), StoreError> {
        let data = commit(data);
        match mode {
            WriteMode::Overwrite => {
                self.tree(path.parent())?
                    .insert(path.id().as_bytes(), encode(&data)?)?;
            }
            WriteMode::Merge => self.modify(path, |current| {
                let mut merged = current.unwrap_or_default();
                merge_deep(&mut merged, data.clone());
                Ok(merged)
            })?,
        }
        self.flush().await?;
        debug!(path = %path, ?mode, "Set document");
        Ok(())
    }

    async fn update(&self, path: &DocPath, data: Fields) -> Result<(), StoreError> {
        if self.existing_tree(path.parent())?.is_none() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        let data = commit(data);
        self.modify(path, |current| {
            let mut existing = current.ok_or_else(|| StoreError::NotFound(path.to_string()))?;
            apply_update(&mut existing, data.clone());
            Ok(existing)
        })?;
        self.flush().await?;
        debug!(path = %path, "Updated document");
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        let Some(tree) = self.existing_tree(path.parent())? else {
            return Ok(());
        };
        let removed = tree.remove(path.id().as_bytes())?;
        if removed.is_some() {
            self.flush().await?;
            debug!(path = %path, "Deleted document");
        }
        Ok(())
    }
}
