use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open workbook {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read sheet '{sheet}': {message}")]
    Read { sheet: String, message: String },

    #[error("sheet '{0}' not found")]
    MissingSheet(String),

    #[error("workbook {0:?} has no sheets")]
    EmptyWorkbook(PathBuf),

    #[error("failed to read csv '{name}': {source}")]
    Csv {
        name: String,
        #[source]
        source: csv::Error,
    },
}
