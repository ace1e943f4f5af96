//! Categories: a small collection listed whole, newest first

use std::sync::Arc;

use tracing::info;

use crate::db::schemas::{Category, CategoryPatch, CATEGORY_COLLECTION};
use crate::db::store::{CollectionPath, Direction, DocumentStore, OrderBy};
use crate::db::TypedCollection;
use crate::error::StoreError;

#[derive(Clone)]
pub struct CategoriesRepo {
    collection: TypedCollection<Category>,
}

impl CategoriesRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            collection: TypedCollection::new(store, CollectionPath::known(CATEGORY_COLLECTION)),
        }
    }

    fn order() -> OrderBy {
        OrderBy {
            field: "created_at".into(),
            direction: Direction::Descending,
        }
    }

    /// All categories, `created_at` descending
    pub async fn list(&self) -> Result<Vec<Category>, StoreError> {
        self.collection.list_ordered(&Self::order()).await
    }

    /// Create; an unset `created_at` is assigned by the store
    pub async fn create(&self, category: &Category) -> Result<String, StoreError> {
        let id = self.collection.insert(category).await?;
        info!(id = %id, name = %category.name, "Created category");
        Ok(id)
    }

    pub async fn update(&self, id: &str, patch: &CategoryPatch) -> Result<(), StoreError> {
        self.collection.update(id, patch).await
    }

    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.collection.remove(id).await?;
        info!(id = %id, "Removed category");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Category>, StoreError> {
        self.collection.get(id).await
    }
}
