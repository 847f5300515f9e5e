use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::SheetError;
use crate::table::Sheet;

/// Read a CSV stream into a raw [`Sheet`] named `name`.
///
/// Rows may have differing lengths; a UTF-8 byte-order mark on the first cell
/// is dropped. Cells that are not valid UTF-8 are decoded lossily.
pub fn read_csv<R: Read>(name: &str, reader: R) -> Result<Sheet, SheetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut lossy_rows = 0usize;
    for record in rdr.byte_records() {
        let record = record.map_err(|source| SheetError::Csv {
            name: name.to_string(),
            source,
        })?;
        let mut lossy = false;
        let row = record
            .iter()
            .map(|field| match std::str::from_utf8(field) {
                Ok(text) => text.to_string(),
                Err(_) => {
                    lossy = true;
                    String::from_utf8_lossy(field).into_owned()
                }
            })
            .collect::<Vec<_>>();
        if lossy {
            lossy_rows += 1;
        }
        rows.push(row);
    }
    if lossy_rows > 0 {
        tracing::warn!(sheet = name, rows = lossy_rows, "non-utf8 cells replaced");
    }

    if let Some(first) = rows.first_mut().and_then(|r| r.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    Ok(Sheet::new(name, rows))
}

pub fn read_csv_path(path: &Path) -> Result<Sheet, SheetError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = File::open(path).map_err(|e| SheetError::Csv {
        name: name.clone(),
        source: csv::Error::from(e),
    })?;
    read_csv(&name, file)
}
