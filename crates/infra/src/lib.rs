//! Infrastructure adapters: persistent stock storage.

pub mod sqlite;

pub use sqlite::SqliteProductStore;
