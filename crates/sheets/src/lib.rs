//! `wms-sheets`
//!
//! **Responsibility:** read tabular sources (workbooks and CSV exports) into
//! plain string grids, and give callers header-addressed access to them.
//!
//! Nothing here knows about products or platforms; the catalog loader and the
//! sales ingestor decide which sheets and columns they need.

pub mod csv_source;
pub mod error;
pub mod table;
pub mod workbook;

pub use csv_source::{read_csv, read_csv_path};
pub use error::SheetError;
pub use table::{Row, Sheet, Table};
pub use workbook::{InMemoryWorkbook, Workbook, XlsxWorkbook, find_sheet, read_first_sheet};
