//! Repositories exposed to the console
//!
//! Typed repos cover the fixed-schema collections; the generic accessor
//! covers nested and free-form documents. All of them share one injected
//! store handle.

mod categories;
mod langs;
mod subcollection;
mod users;
mod words;
mod worlds;

use std::sync::Arc;

use crate::db::store::DocumentStore;

pub use categories::CategoriesRepo;
pub use langs::{LangsRepo, LANG_COLLECTION};
pub use subcollection::{GenericRecord, SubcollectionAccessor};
pub use users::{user_profiles_path, UsersRepo, PROFILES_SUBCOLLECTION};
pub use words::{ImportSummary, WordsRepo};
pub use worlds::{world_games_path, WorldsRepo, GAMES_SUBCOLLECTION};

/// Every repository, built over one store
#[derive(Clone)]
pub struct Repositories {
    pub categories: CategoriesRepo,
    pub words: WordsRepo,
    pub worlds: WorldsRepo,
    pub users: UsersRepo,
    pub langs: LangsRepo,
    pub docs: SubcollectionAccessor,
}

impl Repositories {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            categories: CategoriesRepo::new(Arc::clone(&store)),
            words: WordsRepo::new(Arc::clone(&store)),
            worlds: WorldsRepo::new(Arc::clone(&store)),
            users: UsersRepo::new(Arc::clone(&store)),
            langs: LangsRepo::new(Arc::clone(&store)),
            docs: SubcollectionAccessor::new(store),
        }
    }
}
