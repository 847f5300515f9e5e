//! Sales file ingestion.
//!
//! Detects the marketplace of a sales export from its header shape, resolves
//! every row through [`wms_mapping::SkuResolver`] and returns the accepted
//! records together with a per-row error report.

pub mod discover;
pub mod error;
pub mod export;
pub mod ingestor;
pub mod platform;
pub mod record;

pub use discover::{collect_sales_files, mapped_output_path};
pub use error::IngestError;
pub use export::write_mapped_csv;
pub use ingestor::Ingestor;
pub use platform::{PlatformLayout, detect_platform};
pub use record::{IngestReport, IngestStatus, RowError, RowFailure, SalesRecord};
