//! Users: paged newest first by `createDate`, each with a `Profiles`
//! subcollection

use std::sync::Arc;

use tracing::info;

use crate::db::schemas::{UserPatch, UserRecord, USER_COLLECTION};
use crate::db::store::{CollectionPath, Direction, DocumentStore, OrderBy};
use crate::db::{Page, TypedCollection};
use crate::error::StoreError;

/// Subcollection holding a user's profiles
pub const PROFILES_SUBCOLLECTION: &str = "Profiles";

/// Address of a user's profiles, for the generic accessor
pub fn user_profiles_path(user_id: &str) -> Result<CollectionPath, StoreError> {
    CollectionPath::known(USER_COLLECTION)
        .doc(user_id)?
        .collection(PROFILES_SUBCOLLECTION)
}

#[derive(Clone)]
pub struct UsersRepo {
    collection: TypedCollection<UserRecord>,
}

impl UsersRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            collection: TypedCollection::new(store, CollectionPath::known(USER_COLLECTION)),
        }
    }

    fn order() -> OrderBy {
        OrderBy {
            field: "createDate".into(),
            direction: Direction::Descending,
        }
    }

    /// One page by `createDate` descending, resuming after `cursor`
    pub async fn list_page(
        &self,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page<UserRecord>, StoreError> {
        self.collection.page(&Self::order(), page_size, cursor).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.collection.get(id).await
    }

    /// Create; an unset `createDate` is assigned by the store
    pub async fn create(&self, user: &UserRecord) -> Result<String, StoreError> {
        let id = self.collection.insert(user).await?;
        info!(id = %id, "Created user");
        Ok(id)
    }

    /// Merge-write: creates the user when absent, otherwise deep-merges
    pub async fn upsert(&self, id: &str, patch: &UserPatch) -> Result<(), StoreError> {
        self.collection.upsert(id, patch).await?;
        info!(id = %id, "Upserted user");
        Ok(())
    }

    pub async fn update(&self, id: &str, patch: &UserPatch) -> Result<(), StoreError> {
        self.collection.update(id, patch).await
    }

    /// Removes the user document only; its profiles stay addressable
    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.collection.remove(id).await?;
        info!(id = %id, "Removed user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::UserSettings;
    use crate::db::store::{MemoryStore, Timestamp};

    fn repo() -> UsersRepo {
        UsersRepo::new(Arc::new(MemoryStore::new()))
    }

    fn user_created(at: &str) -> UserRecord {
        UserRecord {
            create_date: Timestamp::parse(at),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_pages_newest_first() {
        let repo = repo();
        let oldest = repo.create(&user_created("2023-01-01T00:00:00Z")).await.unwrap();
        let newest = repo.create(&user_created("2025-01-01T00:00:00Z")).await.unwrap();
        let middle = repo.create(&user_created("2024-01-01T00:00:00Z")).await.unwrap();

        let first = repo.list_page(2, None).await.unwrap();
        let ids: Vec<&str> = first.items.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec![newest.as_str(), middle.as_str()]);
        assert_eq!(first.last_id.as_deref(), Some(middle.as_str()));

        let second = repo.list_page(2, first.last_id.as_deref()).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].id, oldest);
        assert_eq!(second.last_id, None);
    }

    #[tokio::test]
    async fn test_upsert_creates_then_merges() {
        let repo = repo();
        let patch = UserPatch {
            is_open: Some(true),
            settings: Some(UserSettings {
                language: "he".into(),
                music_on_bg: true,
                notifications: true,
            }),
            ..Default::default()
        };
        repo.upsert("u1", &patch).await.unwrap();

        let patch = UserPatch {
            active_subscription: Some(true),
            ..Default::default()
        };
        repo.upsert("u1", &patch).await.unwrap();

        let user = repo.get("u1").await.unwrap().unwrap();
        assert!(user.is_open);
        assert!(user.active_subscription);
        assert_eq!(user.settings.language, "he");
        assert_eq!(user.create_date, None);
    }

    #[tokio::test]
    async fn test_update_clears_subscription_end() {
        let repo = repo();
        let id = repo
            .create(&UserRecord {
                subscription_end_date: Timestamp::parse("2026-01-01T00:00:00Z"),
                ..Default::default()
            })
            .await
            .unwrap();

        let patch = UserPatch {
            subscription_end_date: Some(None),
            ..Default::default()
        };
        repo.update(&id, &patch).await.unwrap();

        let user = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(user.subscription_end_date, None);
        assert!(user.create_date.is_some());
    }

    #[test]
    fn test_profiles_path() {
        assert_eq!(user_profiles_path("u1").unwrap().key(), "users/u1/Profiles");
    }
}
