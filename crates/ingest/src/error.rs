use thiserror::Error;

use wms_core::Platform;
use wms_sheets::SheetError;

/// File-level ingestion failure: the whole file is rejected, no rows processed.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("'{file}': header does not match any Amazon, Flipkart or Meesho export")]
    UnknownPlatform { file: String },

    #[error("'{file}': {platform} export is missing column '{column}'")]
    MissingColumn {
        file: String,
        platform: Platform,
        column: &'static str,
    },

    #[error(transparent)]
    Source(#[from] SheetError),
}
