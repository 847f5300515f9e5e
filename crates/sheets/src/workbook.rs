use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, DataType, Reader, Sheets, open_workbook_auto};
use wms_core::normalize_name;

use crate::csv_source::read_csv_path;
use crate::error::SheetError;
use crate::table::Sheet;

/// A source of named sheets.
///
/// The catalog loader works against this trait so tests can hand it an
/// [`InMemoryWorkbook`] instead of an `.xlsx` file.
pub trait Workbook {
    fn sheet_names(&self) -> Vec<String>;

    fn read_sheet(&mut self, name: &str) -> Result<Sheet, SheetError>;
}

/// Find the actual sheet name matching any of `aliases` (normalised names).
pub fn find_sheet<W: Workbook + ?Sized>(workbook: &W, aliases: &[&str]) -> Option<String> {
    let names = workbook.sheet_names();
    aliases.iter().find_map(|alias| {
        names
            .iter()
            .find(|n| normalize_name(n) == *alias)
            .cloned()
    })
}

/// In-memory workbook for tests and programmatic construction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheets: Vec<Sheet>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        self.sheets.push(Sheet::new(name, rows));
        self
    }
}

impl Workbook for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Sheet, SheetError> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| SheetError::MissingSheet(name.to_string()))
    }
}

/// Spreadsheet file (xlsx, xlsm, xls, ods) read through calamine.
pub struct XlsxWorkbook {
    path: PathBuf,
    inner: Sheets<BufReader<File>>,
}

impl XlsxWorkbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref().to_path_buf();
        let inner = open_workbook_auto(&path).map_err(|source| SheetError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl core::fmt::Debug for XlsxWorkbook {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("XlsxWorkbook").field("path", &self.path).finish()
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Sheet, SheetError> {
        let range = self
            .inner
            .worksheet_range(name)
            .map_err(|e| SheetError::Read {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        Ok(Sheet::new(name, rows))
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // Excel stores every number as a float; render whole numbers without ".0".
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

/// Read the single table of a sales export: CSV by extension, otherwise the
/// first sheet of a workbook.
pub fn read_first_sheet(path: impl AsRef<Path>) -> Result<Sheet, SheetError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        return read_csv_path(path);
    }

    let mut workbook = XlsxWorkbook::open(path)?;
    let first = workbook
        .sheet_names()
        .into_iter()
        .next()
        .ok_or_else(|| SheetError::EmptyWorkbook(path.to_path_buf()))?;
    tracing::debug!(path = %path.display(), sheet = %first, "reading first sheet");
    workbook.read_sheet(&first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_lookup_tolerates_trailing_whitespace() {
        let wb = InMemoryWorkbook::new()
            .with_sheet("Current Inventory ", vec![])
            .with_sheet("Combos skus", vec![]);
        assert_eq!(
            find_sheet(&wb, &["current inventory", "inventory"]),
            Some("Current Inventory ".to_string())
        );
        assert_eq!(find_sheet(&wb, &["msku with skus"]), None);
    }

    #[test]
    fn in_memory_read_of_unknown_sheet_fails() {
        let mut wb = InMemoryWorkbook::new();
        assert!(matches!(wb.read_sheet("nope"), Err(SheetError::MissingSheet(_))));
    }

    #[test]
    fn whole_floats_render_as_integers() {
        assert_eq!(cell_text(&Data::Float(12.0)), "12");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
