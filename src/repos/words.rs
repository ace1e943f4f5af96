//! Words: a large collection paged by `title_en`
//!
//! Continuation pages use the same ordering key as the first page, so a
//! full walk of the collection is one consistent scan.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::info;

use crate::db::schemas::{Word, WordPatch, WORD_COLLECTION};
use crate::db::store::{CollectionPath, Direction, DocumentStore, Fields, OrderBy};
use crate::db::{Page, TypedCollection};
use crate::error::StoreError;

/// Result of a bulk import
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
}

enum ImportOutcome {
    Created,
    Updated,
}

#[derive(Clone)]
pub struct WordsRepo {
    collection: TypedCollection<Word>,
}

impl WordsRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            collection: TypedCollection::new(store, CollectionPath::known(WORD_COLLECTION)),
        }
    }

    fn order() -> OrderBy {
        OrderBy {
            field: "title_en".into(),
            direction: Direction::Ascending,
        }
    }

    /// One page by `title_en` ascending, resuming after `cursor`
    pub async fn list_page(
        &self,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page<Word>, StoreError> {
        self.collection.page(&Self::order(), page_size, cursor).await
    }

    /// Create; an unset `created_at` is assigned by the store
    pub async fn create(&self, word: &Word) -> Result<String, StoreError> {
        let id = self.collection.insert(word).await?;
        info!(id = %id, title = %word.title_en, "Created word");
        Ok(id)
    }

    pub async fn update(&self, id: &str, patch: &WordPatch) -> Result<(), StoreError> {
        self.collection.update(id, patch).await
    }

    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.collection.remove(id).await?;
        info!(id = %id, "Removed word");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Word>, StoreError> {
        self.collection.get(id).await
    }

    /// Copy a word under a fresh id with a fresh `created_at`.
    ///
    /// Returns `None` when the source word does not exist.
    pub async fn duplicate(&self, id: &str) -> Result<Option<String>, StoreError> {
        let Some(mut word) = self.get(id).await? else {
            return Ok(None);
        };
        word.id.clear();
        word.created_at = None;
        let copy_id = self.create(&word).await?;
        info!(source = %id, id = %copy_id, "Duplicated word");
        Ok(Some(copy_id))
    }

    /// Create-or-update from parsed rows.
    ///
    /// A row with a non-empty `id` updates that word, any other row creates
    /// one. Rows are independent, so up to `concurrency` writes run at once.
    /// The first failure is returned and no further rows are issued.
    pub async fn import_rows(
        &self,
        rows: &[Fields],
        concurrency: usize,
    ) -> Result<ImportSummary, StoreError> {
        let outcomes: Vec<ImportOutcome> = stream::iter(rows.iter().map(|row| self.import_row(row)))
            .buffer_unordered(concurrency.max(1))
            .try_collect()
            .await?;

        let summary = outcomes
            .iter()
            .fold(ImportSummary::default(), |mut summary, outcome| {
                match outcome {
                    ImportOutcome::Created => summary.created += 1,
                    ImportOutcome::Updated => summary.updated += 1,
                }
                summary
            });
        info!(created = summary.created, updated = summary.updated, "Imported words");
        Ok(summary)
    }

    async fn import_row(&self, row: &Fields) -> Result<ImportOutcome, StoreError> {
        match Word::from_import_row(row) {
            (Some(id), word) => {
                self.update(&id, &word.to_patch()).await?;
                Ok(ImportOutcome::Updated)
            }
            (None, word) => {
                self.collection.insert(&word).await?;
                Ok(ImportOutcome::Created)
            }
        }
    }
}
