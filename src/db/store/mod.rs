//! Document store boundary
//!
//! A schemaless store of named collections of id-keyed documents, where a
//! document may own further named subcollections to any depth. Repositories
//! only ever talk to the store through [`DocumentStore`], so the concrete
//! backend is chosen at startup and injected as `Arc<dyn DocumentStore>`.
//!
//! Backends:
//! - [`MemoryStore`] - process-local, used by tests and throwaway sessions
//! - [`SledStore`] - embedded persistent store, one sled tree per collection

mod fields;
mod memory;
mod path;
mod query;
mod sled_store;
mod timestamp;

use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use serde_json::{Map, Value};

use crate::error::StoreError;

pub use fields::{field_value, is_server_timestamp, server_timestamp, SERVER_TIMESTAMP_KEY};
pub use memory::MemoryStore;
pub use path::{CollectionPath, DocPath};
pub use query::{compare_values, Direction, OrderBy, Query};
pub use sled_store::SledStore;
pub use timestamp::Timestamp;

pub(crate) use fields::{apply_update, merge_deep, resolve_sentinels};
pub(crate) use query::{run_query, take_ordered};

/// Untyped document body as it travels over the wire.
pub type Fields = Map<String, Value>;

/// Length of store-generated document ids.
pub const GENERATED_ID_LEN: usize = 20;

/// A document read back from the store: its own id plus its body.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub data: Fields,
}

impl Snapshot {
    pub fn new(id: impl Into<String>, data: Fields) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// How `set` treats an existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the whole document body
    Overwrite,
    /// Deep-merge into the existing body, creating the document if absent
    Merge,
}

/// Remote document store client.
///
/// Every write resolves [`server_timestamp`] markers to the commit time.
/// Writes are atomic per document; nothing spans documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document, `None` when absent
    async fn get(&self, path: &DocPath) -> Result<Option<Snapshot>, StoreError>;

    /// Read every document of a collection in store-default order
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Snapshot>, StoreError>;

    /// Ordered, limited, optionally cursored read.
    ///
    /// The default evaluates the query over [`DocumentStore::list`]; a
    /// backend with server-side indexes should override it.
    async fn query(
        &self,
        collection: &CollectionPath,
        query: &Query,
    ) -> Result<Vec<Snapshot>, StoreError> {
        let docs = self.list(collection).await?;
        Ok(run_query(docs, query))
    }

    /// Insert under a store-generated id and return that id
    async fn add(&self, collection: &CollectionPath, data: Fields) -> Result<String, StoreError>;

    /// Write under a caller-supplied id
    async fn set(&self, path: &DocPath, data: Fields, mode: WriteMode) -> Result<(), StoreError>;

    /// Partial merge into an existing document.
    ///
    /// Keys containing `.` address nested fields. Fails with
    /// [`StoreError::NotFound`] when the document does not exist.
    async fn update(&self, path: &DocPath, data: Fields) -> Result<(), StoreError>;

    /// Delete a document. Deleting an absent document is a no-op.
    async fn delete(&self, path: &DocPath) -> Result<(), StoreError>;
}

/// Generate a document id in the store's id alphabet
pub(crate) fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_ID_LEN)
        .map(char::from)
        .collect()
}
