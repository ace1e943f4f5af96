//! Lang documents: free-form, top-level, store-generated ids

use std::sync::Arc;

use crate::db::store::{DocumentStore, Fields};
use crate::error::StoreError;

use super::subcollection::{GenericRecord, SubcollectionAccessor};

/// Collection name for lang documents
pub const LANG_COLLECTION: &str = "langs";

const LANG_PATH: [&str; 1] = [LANG_COLLECTION];

#[derive(Clone)]
pub struct LangsRepo {
    docs: SubcollectionAccessor,
}

impl LangsRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            docs: SubcollectionAccessor::new(store),
        }
    }

    pub async fn list(&self) -> Result<Vec<GenericRecord>, StoreError> {
        self.docs.list(&LANG_PATH).await
    }

    pub async fn create(&self, payload: Fields) -> Result<String, StoreError> {
        self.docs.create(&LANG_PATH, payload).await
    }

    pub async fn update(&self, id: &str, payload: Fields) -> Result<(), StoreError> {
        self.docs.update(&LANG_PATH, id, payload).await
    }

    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.docs.remove(&LANG_PATH, id).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<GenericRecord>, StoreError> {
        self.docs.get(&LANG_PATH, id).await
    }
}
