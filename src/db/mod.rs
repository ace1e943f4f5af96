//! Database layer: the store boundary, typed schemas, and the typed
//! collection handle that joins them.

pub mod collection;
pub mod schemas;
pub mod store;

pub use collection::{Page, TypedCollection};
