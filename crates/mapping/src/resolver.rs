use std::sync::Arc;

use serde::{Deserialize, Serialize};

use wms_catalog::{Catalog, ComboDefinition};
use wms_core::{Msku, Platform, Sku, ValueObject};

use crate::error::ResolveError;
use crate::normalize::normalize_sku;

/// One MSKU quantity consumed by a sale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedLine {
    pub msku: Msku,
    pub quantity: i64,
}

impl ValueObject for ResolvedLine {}

/// How a sold SKU maps onto inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Single,
    Combo,
}

/// Full resolution result: the normalised SKU, its kind and the lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub sku: Sku,
    pub kind: ProductKind,
    pub lines: Vec<ResolvedLine>,
}

/// Resolves sold SKUs against a shared, read-only catalog.
///
/// Precedence is fixed: a combo definition is checked before the direct
/// mapping, so a SKU listed in both always expands as a combo.
#[derive(Debug, Clone)]
pub struct SkuResolver {
    catalog: Arc<Catalog>,
}

impl SkuResolver {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve `raw_sku` sold on `platform` into `(msku, quantity)` lines.
    pub fn resolve(
        &self,
        platform: Platform,
        raw_sku: &str,
        order_qty: i64,
    ) -> Result<Vec<ResolvedLine>, ResolveError> {
        self.resolve_detailed(platform, raw_sku, order_qty)
            .map(|r| r.lines)
    }

    pub fn resolve_detailed(
        &self,
        platform: Platform,
        raw_sku: &str,
        order_qty: i64,
    ) -> Result<Resolution, ResolveError> {
        let sku = self.lookup_key(platform, raw_sku)?;

        if let Some(combo) = self.catalog.combo(&sku) {
            let lines = self.expand_combo(combo, order_qty)?;
            return Ok(Resolution {
                sku,
                kind: ProductKind::Combo,
                lines,
            });
        }

        if let Some(msku) = self.catalog.mapping(platform, &sku) {
            if order_qty <= 0 {
                return Err(ResolveError::InvalidQuantity { quantity: order_qty });
            }
            let line = ResolvedLine {
                msku: self.catalog.canonical_msku(msku),
                quantity: order_qty,
            };
            return Ok(Resolution {
                sku,
                kind: ProductKind::Single,
                lines: vec![line],
            });
        }

        tracing::debug!(%platform, %sku, "sku not in catalog");
        Err(ResolveError::UnmappedSku {
            platform,
            sku: sku.to_string(),
        })
    }

    /// Whether `raw_sku` is a combo, a single product, or unknown on `platform`.
    pub fn classify(&self, platform: Platform, raw_sku: &str) -> Option<ProductKind> {
        let sku = self.lookup_key(platform, raw_sku).ok()?;
        if self.catalog.combo(&sku).is_some() {
            Some(ProductKind::Combo)
        } else if self.catalog.mapping(platform, &sku).is_some() {
            Some(ProductKind::Single)
        } else {
            None
        }
    }

    fn lookup_key(&self, platform: Platform, raw_sku: &str) -> Result<Sku, ResolveError> {
        let normalized = normalize_sku(platform, raw_sku);
        Sku::new(&normalized).map_err(|_| ResolveError::UnmappedSku {
            platform,
            sku: raw_sku.trim().to_string(),
        })
    }

    fn expand_combo(
        &self,
        combo: &ComboDefinition,
        order_qty: i64,
    ) -> Result<Vec<ResolvedLine>, ResolveError> {
        let invalid = |reason: String| ResolveError::InvalidCombo {
            sku: combo.sku.to_string(),
            reason,
        };

        if combo.components.is_empty() {
            return Err(invalid("combo has no components".to_string()));
        }

        combo
            .components
            .iter()
            .map(|c| {
                let quantity = c.quantity.checked_mul(order_qty).ok_or_else(|| {
                    invalid(format!("quantity overflow for component '{}'", c.msku))
                })?;
                if quantity <= 0 {
                    return Err(invalid(format!(
                        "component '{}' resolves to non-positive quantity {quantity} \
                         ({} per unit x {order_qty})",
                        c.msku, c.quantity
                    )));
                }
                Ok(ResolvedLine {
                    msku: self.catalog.canonical_msku(&c.msku),
                    quantity,
                })
            })
            .collect()
    }
}
