//! Worlds: ordered by `orderId`, each with a `games` subcollection

use std::sync::Arc;

use tracing::info;

use crate::db::schemas::{World, WorldPatch, WORLD_COLLECTION};
use crate::db::store::{CollectionPath, Direction, DocumentStore, OrderBy};
use crate::db::TypedCollection;
use crate::error::StoreError;

/// Subcollection holding a world's games
pub const GAMES_SUBCOLLECTION: &str = "games";

/// Address of a world's games, for the generic accessor
pub fn world_games_path(world_id: &str) -> Result<CollectionPath, StoreError> {
    CollectionPath::known(WORLD_COLLECTION)
        .doc(world_id)?
        .collection(GAMES_SUBCOLLECTION)
}

#[derive(Clone)]
pub struct WorldsRepo {
    collection: TypedCollection<World>,
}

impl WorldsRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            collection: TypedCollection::new(store, CollectionPath::known(WORLD_COLLECTION)),
        }
    }

    /// All worlds, `orderId` ascending
    pub async fn list(&self) -> Result<Vec<World>, StoreError> {
        let order = OrderBy {
            field: "orderId".into(),
            direction: Direction::Ascending,
        };
        self.collection.list_ordered(&order).await
    }

    pub async fn create(&self, world: &World) -> Result<String, StoreError> {
        let id = self.collection.insert(world).await?;
        info!(id = %id, title = %world.title_en, "Created world");
        Ok(id)
    }

    pub async fn update(&self, id: &str, patch: &WorldPatch) -> Result<(), StoreError> {
        self.collection.update(id, patch).await
    }

    /// Removes the world document only; its games stay addressable
    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.collection.remove(id).await?;
        info!(id = %id, "Removed world");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<World>, StoreError> {
        self.collection.get(id).await
    }
}
