use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use wms_core::{Entity, Msku, Platform, Sku};
use wms_sheets::{Workbook, XlsxWorkbook};

use crate::error::SchemaError;
use crate::loader;
use crate::model::{ComboDefinition, Product, SkuMapping};

/// Immutable master catalog.
///
/// Lookups are case-insensitive on SKU/MSKU. Products are kept ordered by MSKU.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<Msku, Product>,
    mappings: HashMap<(Option<Platform>, Sku), Msku>,
    combos: HashMap<Sku, ComboDefinition>,
}

impl Catalog {
    /// Load the three catalog tables from a workbook.
    pub fn load<W: Workbook + ?Sized>(workbook: &mut W) -> Result<Self, SchemaError> {
        let products = loader::load_inventory(workbook)?;
        let mappings = loader::load_mappings(workbook)?;
        let combos = loader::load_combos(workbook)?;
        let catalog = Self::from_parts(products, mappings, combos)?;
        tracing::info!(
            products = catalog.products.len(),
            mappings = catalog.mappings.len(),
            combos = catalog.combos.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Open an `.xlsx`/`.xls`/`.ods` master workbook and load it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let mut workbook = XlsxWorkbook::open(path)?;
        Self::load(&mut workbook)
    }

    /// Assemble a catalog from already-parsed records.
    ///
    /// Duplicate products are rejected. For duplicated mapping or combo keys the
    /// first entry wins.
    pub fn from_parts(
        products: Vec<Product>,
        mappings: Vec<SkuMapping>,
        combos: Vec<ComboDefinition>,
    ) -> Result<Self, SchemaError> {
        let mut catalog = Self::default();

        for product in products {
            let id = product.id().clone();
            if catalog.products.contains_key(&id) {
                return Err(SchemaError::DuplicateProduct {
                    sheet: loader::INVENTORY_SHEET.to_string(),
                    msku: id.to_string(),
                });
            }
            catalog.products.insert(id, product);
        }

        for mapping in mappings {
            let key = (mapping.platform, mapping.sku.clone());
            if let Some(existing) = catalog.mappings.get(&key) {
                if *existing != mapping.msku {
                    tracing::warn!(
                        sku = %mapping.sku,
                        kept = %existing,
                        ignored = %mapping.msku,
                        "conflicting sku mapping; keeping first"
                    );
                }
                continue;
            }
            catalog.mappings.insert(key, mapping.msku);
        }

        for combo in combos {
            if catalog.combos.contains_key(&combo.sku) {
                tracing::warn!(sku = %combo.sku, "duplicate combo definition; keeping first");
                continue;
            }
            catalog.combos.insert(combo.sku.clone(), combo);
        }

        Ok(catalog)
    }

    pub fn product(&self, msku: &Msku) -> Option<&Product> {
        self.products.get(msku)
    }

    /// Products ordered by MSKU.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Direct mapping for `sku`: an entry for `platform` first, then a
    /// platform-agnostic one.
    pub fn mapping(&self, platform: Platform, sku: &Sku) -> Option<&Msku> {
        self.mappings
            .get(&(Some(platform), sku.clone()))
            .or_else(|| self.mappings.get(&(None, sku.clone())))
    }

    pub fn combo(&self, sku: &Sku) -> Option<&ComboDefinition> {
        self.combos.get(sku)
    }

    /// Spelling of `msku` as listed in the inventory sheet, if present.
    pub fn canonical_msku(&self, msku: &Msku) -> Msku {
        self.products
            .get_key_value(msku)
            .map(|(k, _)| k.clone())
            .unwrap_or_else(|| msku.clone())
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    pub fn combo_count(&self) -> usize {
        self.combos.len()
    }
}
