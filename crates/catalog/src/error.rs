use thiserror::Error;
use wms_sheets::SheetError;

/// Fatal catalog load failure. Names the sheet/column so the workbook can be fixed.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("workbook has no '{sheet}' sheet")]
    MissingSheet { sheet: &'static str },

    #[error("sheet '{sheet}' is missing column '{column}'")]
    MissingColumn { sheet: String, column: &'static str },

    #[error("sheet '{sheet}' row {row}, column '{column}': invalid value '{value}'")]
    InvalidCell {
        sheet: String,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("sheet '{sheet}' lists product '{msku}' more than once")]
    DuplicateProduct { sheet: String, msku: String },

    #[error(transparent)]
    Source(#[from] SheetError),
}
