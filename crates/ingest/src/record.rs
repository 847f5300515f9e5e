use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use wms_core::{Platform, Sku};
use wms_mapping::{ProductKind, ResolveError, ResolvedLine};

/// One resolved sales row. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub file_name: String,
    /// Spreadsheet row number (1-based, header counted).
    pub row: usize,
    pub platform: Platform,
    /// SKU exactly as it appeared in the export.
    pub raw_sku: String,
    /// SKU after platform normalisation.
    pub sku: Sku,
    pub order_qty: i64,
    pub order_id: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub kind: ProductKind,
    pub lines: Vec<ResolvedLine>,
}

impl SalesRecord {
    /// Total MSKU units this record consumes.
    pub fn units(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Why a row was not accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RowError {
    #[error("row has no sku")]
    MissingSku,

    #[error("quantity '{value}' is not a whole number")]
    InvalidQuantity { value: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// A rejected row in the per-file error report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub raw_sku: String,
    pub error: RowError,
}

/// Overall outcome of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    Success,
    Partial,
    Failed,
}

/// Result of ingesting one sales file: accepted records plus every failure.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub batch_id: Uuid,
    pub file_name: String,
    pub platform: Platform,
    /// Non-blank data rows seen.
    pub total_rows: usize,
    pub records: Vec<SalesRecord>,
    pub errors: Vec<RowFailure>,
}

impl IngestReport {
    pub fn status(&self) -> IngestStatus {
        if self.errors.is_empty() {
            IngestStatus::Success
        } else if self.records.is_empty() {
            IngestStatus::Failed
        } else {
            IngestStatus::Partial
        }
    }
}
