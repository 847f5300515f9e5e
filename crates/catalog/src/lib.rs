//! Master catalog (products, SKU mappings, combo definitions).
//!
//! The catalog is loaded once from the master workbook and is immutable
//! afterwards; share it as `Arc<Catalog>` with resolvers and ingestors.

pub mod catalog;
pub mod error;
pub mod loader;
pub mod model;

pub use catalog::Catalog;
pub use error::SchemaError;
pub use model::{ComboComponent, ComboDefinition, Product, SkuMapping};
