//! `wms-core`: shared warehouse domain building blocks.
//!
//! This crate contains **pure domain** primitives (no file or database IO).

pub mod entity;
pub mod error;
pub mod id;
pub mod name;
pub mod value_object;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{Msku, Platform, Sku};
pub use name::normalize_name;
pub use value_object::ValueObject;
