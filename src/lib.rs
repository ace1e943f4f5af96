//! Vocab Admin Store - data-access layer for the vocabulary game console
//!
//! Typed repositories over a schemaless document store for the console's
//! collections: categories, words, worlds, users, and free-form nested
//! documents such as `worlds/{id}/games` and `users/{id}/Profiles`.
//!
//! ## Architecture
//!
//! - **Store** (`db::store`): the [`DocumentStore`] boundary plus two
//!   backends, [`MemoryStore`] and [`SledStore`]
//! - **Schemas** (`db::schemas`): typed records and their wire converters
//! - **Collections** (`db::collection`): typed handle with cursor pagination
//! - **Repos** (`repos`): one repository per collection, bundled in
//!   [`Repositories`]
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.local/share/vocab-admin/
//! └── store.sled/            # One sled tree per collection path
//!     ├── categories
//!     ├── words
//!     ├── worlds
//!     ├── worlds/{id}/games
//!     ├── users
//!     ├── users/{id}/Profiles
//!     └── langs
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod repos;

pub use config::{Backend, Config};
pub use db::schemas::{
    Category, CategoryPatch, UserPatch, UserRecord, UserSettings, Word, WordFilter, WordPatch,
    World, WorldPatch,
};
pub use db::store::{
    server_timestamp, CollectionPath, DocPath, DocumentStore, Fields, MemoryStore, SledStore,
    Timestamp,
};
pub use db::{Page, TypedCollection};
pub use error::StoreError;
pub use repos::{
    CategoriesRepo, GenericRecord, ImportSummary, LangsRepo, Repositories, SubcollectionAccessor,
    UsersRepo, WordsRepo, WorldsRepo,
};
