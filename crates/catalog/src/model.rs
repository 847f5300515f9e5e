use serde::{Deserialize, Serialize};

use wms_core::{Entity, Msku, Platform, Sku, ValueObject};

/// A master product row from the inventory sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub msku: Msku,
    pub description: String,
    /// Units on hand at load time (never negative).
    pub stock: i64,
    pub location: String,
}

impl Entity for Product {
    type Id = Msku;

    fn id(&self) -> &Self::Id {
        &self.msku
    }
}

/// `(platform, sku) -> msku`. A `None` platform applies to every marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuMapping {
    pub platform: Option<Platform>,
    pub sku: Sku,
    pub msku: Msku,
}

/// One component of a combo: how many units of `msku` one sold combo consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboComponent {
    pub msku: Msku,
    pub quantity: i64,
}

impl ValueObject for ComboComponent {}

/// A sold SKU that decomposes into several inventory MSKUs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboDefinition {
    pub sku: Sku,
    pub components: Vec<ComboComponent>,
}

impl ComboDefinition {
    pub fn new(sku: Sku) -> Self {
        Self {
            sku,
            components: Vec::new(),
        }
    }

    /// Add a component, folding repeats of the same MSKU into its first position.
    ///
    /// Only positive quantities fold. A non-positive cell, or one whose sum
    /// would overflow, is kept as its own component so resolution rejects it.
    pub fn add_component(&mut self, msku: Msku, quantity: i64) {
        if quantity > 0 {
            let existing = self
                .components
                .iter_mut()
                .find(|c| c.msku == msku && c.quantity > 0);
            if let Some(existing) = existing {
                if let Some(total) = existing.quantity.checked_add(quantity) {
                    existing.quantity = total;
                    return;
                }
            }
        }
        self.components.push(ComboComponent { msku, quantity });
    }
}
