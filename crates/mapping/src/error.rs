use serde::Serialize;
use thiserror::Error;

use wms_core::Platform;

/// Per-row resolution failure. Recoverable: callers collect these and move on.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveError {
    #[error("no mapping for {platform} sku '{sku}'")]
    UnmappedSku { platform: Platform, sku: String },

    #[error("combo '{sku}' is invalid: {reason}")]
    InvalidCombo { sku: String, reason: String },

    #[error("order quantity must be positive (got {quantity})")]
    InvalidQuantity { quantity: i64 },
}
