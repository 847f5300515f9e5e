use std::collections::HashMap;

use wms_core::normalize_name;

/// A raw sheet: every cell rendered as text, header row not yet identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Index of the first row (within the first `max_scan` rows) for which
    /// `is_header` returns true when given that row's normalised cells.
    ///
    /// Workbooks exported by hand often carry a title row above the real
    /// header; scanning a few rows tolerates that.
    pub fn find_header_row<F>(&self, max_scan: usize, is_header: F) -> Option<usize>
    where
        F: Fn(&[String]) -> bool,
    {
        self.rows.iter().take(max_scan).position(|row| {
            let normalized: Vec<String> = row.iter().map(|c| normalize_name(c)).collect();
            is_header(&normalized)
        })
    }

    /// Treat row `header_row` as the header and everything below it as data.
    pub fn into_table(self, header_row: usize) -> Table {
        let mut rows = self.rows;
        let data = if header_row < rows.len() {
            rows.split_off(header_row + 1)
        } else {
            Vec::new()
        };
        let headers = rows.into_iter().nth(header_row).unwrap_or_default();
        Table::new(self.name, headers, data, header_row + 2)
    }
}

/// A sheet with an identified header row and header-addressed access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
    /// Spreadsheet row number (1-based) of the first data row.
    first_row_number: usize,
}

impl Table {
    pub fn new(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        first_row_number: usize,
    ) -> Self {
        let mut index = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            // First occurrence wins for duplicated headers.
            index.entry(normalize_name(h)).or_insert(i);
        }
        Self {
            name: name.into(),
            headers,
            index,
            rows,
            first_row_number,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Normalised header names, in column order.
    pub fn normalized_headers(&self) -> Vec<String> {
        self.headers.iter().map(|h| normalize_name(h)).collect()
    }

    pub fn has_column(&self, normalized: &str) -> bool {
        self.index.contains_key(normalized)
    }

    /// Column index of the first alias present (aliases are normalised names).
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|a| self.index.get(*a).copied())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(move |(i, cells)| Row {
            number: self.first_row_number + i,
            cells,
        })
    }
}

/// One data row of a [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    /// Spreadsheet row number (1-based, header counted).
    pub number: usize,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Trimmed cell text; missing cells read as empty.
    pub fn get(&self, column: usize) -> &'a str {
        self.cells.get(column).map(|c| c.trim()).unwrap_or("")
    }

    pub fn get_opt(&self, column: Option<usize>) -> Option<&'a str> {
        column.map(|c| self.get(c)).filter(|v| !v.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn header_row_below_title_is_found() {
        let sheet = Sheet::new(
            "Current Inventory ",
            grid(&[
                &["Inventory as of 04-02", "", ""],
                &["Product Name", " msku ", "Opening Stock"],
                &["Widget", "M1", "10"],
            ]),
        );
        let header = sheet
            .find_header_row(5, |cells| cells.iter().any(|c| c == "msku"))
            .unwrap();
        assert_eq!(header, 1);

        let table = sheet.into_table(header);
        assert_eq!(table.len(), 1);
        let msku = table.column(&["msku"]).unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get(msku), "M1");
        assert_eq!(row.number, 3);
    }

    #[test]
    fn column_aliases_resolve_in_order() {
        let table = Table::new(
            "t",
            vec!["Item Quantity".into(), "SKU".into()],
            grid(&[&["4", "A"]]),
            2,
        );
        assert_eq!(table.column(&["quantity", "item quantity"]), Some(0));
        assert_eq!(table.column(&["fnsku"]), None);
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let table = Table::new("t", vec!["a".into(), "b".into()], grid(&[&["x"]]), 2);
        let row = table.rows().next().unwrap();
        assert_eq!(row.get(1), "");
        assert_eq!(row.get_opt(Some(1)), None);
        assert_eq!(row.get_opt(Some(0)), Some("x"));
    }
}
