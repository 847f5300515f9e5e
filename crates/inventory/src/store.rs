use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wms_core::Msku;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("product '{0}' is not in the store")]
    UnknownProduct(Msku),

    #[error("delta cannot be zero")]
    ZeroDelta,

    #[error("stock for '{msku}' cannot go negative (stock {stock}, delta {delta})")]
    InsufficientStock { msku: Msku, stock: i64, delta: i64 },

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// One applied stock change (the movement log entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub msku: Msku,
    pub delta: i64,
    pub stock_before: i64,
    pub stock_after: i64,
    /// Batch or file the change came from.
    pub reference: String,
    pub recorded_at: DateTime<Utc>,
}

/// Stock collaborator.
///
/// Implementations must reject zero deltas, unknown products and changes that
/// would leave stock below zero, leaving stock untouched in those cases.
pub trait ProductStore: Send + Sync {
    fn get_stock(&self, msku: &Msku) -> Result<i64, StoreError>;

    fn apply_delta(&self, msku: &Msku, delta: i64, reference: &str)
    -> Result<StockMovement, StoreError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn get_stock(&self, msku: &Msku) -> Result<i64, StoreError> {
        (**self).get_stock(msku)
    }

    fn apply_delta(
        &self,
        msku: &Msku,
        delta: i64,
        reference: &str,
    ) -> Result<StockMovement, StoreError> {
        (**self).apply_delta(msku, delta, reference)
    }
}

/// Shared validation for store implementations: returns the new stock level.
pub fn checked_new_stock(msku: &Msku, stock: i64, delta: i64) -> Result<i64, StoreError> {
    if delta == 0 {
        return Err(StoreError::ZeroDelta);
    }
    match stock.checked_add(delta) {
        Some(next) if next >= 0 => Ok(next),
        _ => Err(StoreError::InsufficientStock {
            msku: msku.clone(),
            stock,
            delta,
        }),
    }
}
