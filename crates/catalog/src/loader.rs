//! Sheet-level parsing of the master workbook into typed records.
//!
//! Every required sheet and column is checked up front; a malformed cell fails
//! the whole load with a [`SchemaError`] naming sheet, row and column.

use wms_core::{Msku, Platform, Sku};
use wms_sheets::{Sheet, Table, Workbook, find_sheet};

use crate::error::SchemaError;
use crate::model::{ComboDefinition, Product, SkuMapping};

pub const INVENTORY_SHEET: &str = "Current Inventory";
pub const MAPPING_SHEET: &str = "Msku With Skus";
pub const COMBO_SHEET: &str = "Combos skus";

const INVENTORY_ALIASES: &[&str] = &["current inventory", "inventory"];
const MAPPING_ALIASES: &[&str] = &["msku with skus", "sku mapping", "mapping"];
const COMBO_ALIASES: &[&str] = &["combos skus", "combo skus", "combos"];

const MSKU_COL: &[&str] = &["msku"];
const STOCK_COL: &[&str] = &["opening stock", "current stock", "stock"];
const DESCRIPTION_COL: &[&str] = &["product name", "description"];
const LOCATION_COL: &[&str] = &["location", "warehouse"];
const SKU_COL: &[&str] = &["sku"];
const PLATFORM_COL: &[&str] = &["platform"];
const COMBO_COL: &[&str] = &["combo", "combo sku"];

/// Number of leading rows searched for the header.
const HEADER_SCAN: usize = 5;
/// Component columns `SKU1..=SKU14`.
const MAX_COMPONENTS: usize = 14;

pub fn load_inventory<W: Workbook + ?Sized>(workbook: &mut W) -> Result<Vec<Product>, SchemaError> {
    let table = open_table(workbook, INVENTORY_ALIASES, INVENTORY_SHEET, MSKU_COL, "msku")?;
    let msku_col = require(&table, MSKU_COL, "msku")?;
    let stock_col = require(&table, STOCK_COL, "Opening Stock")?;
    let description_col = table.column(DESCRIPTION_COL);
    let location_col = table.column(LOCATION_COL);

    let mut products = Vec::with_capacity(table.len());
    for row in table.rows() {
        let raw_msku = row.get(msku_col);
        if raw_msku.is_empty() {
            continue;
        }
        let msku = Msku::new(raw_msku).map_err(|_| invalid(&table, row.number, "msku", raw_msku))?;
        let stock_text = row.get(stock_col);
        let stock = parse_stock(stock_text)
            .ok_or_else(|| invalid(&table, row.number, "Opening Stock", stock_text))?;

        products.push(Product {
            msku,
            description: row.get_opt(description_col).unwrap_or_default().to_string(),
            stock,
            location: row.get_opt(location_col).unwrap_or_default().to_string(),
        });
    }
    Ok(products)
}

pub fn load_mappings<W: Workbook + ?Sized>(workbook: &mut W) -> Result<Vec<SkuMapping>, SchemaError> {
    let table = open_table(workbook, MAPPING_ALIASES, MAPPING_SHEET, SKU_COL, "sku")?;
    let sku_col = require(&table, SKU_COL, "sku")?;
    let msku_col = require(&table, MSKU_COL, "msku")?;
    let platform_col = table.column(PLATFORM_COL);

    let mut mappings = Vec::with_capacity(table.len());
    for row in table.rows() {
        let raw_sku = row.get(sku_col);
        if raw_sku.is_empty() {
            continue;
        }
        let sku = Sku::new(raw_sku).map_err(|_| invalid(&table, row.number, "sku", raw_sku))?;
        let raw_msku = row.get(msku_col);
        let msku = Msku::new(raw_msku).map_err(|_| invalid(&table, row.number, "msku", raw_msku))?;
        let platform = match row.get_opt(platform_col) {
            None => None,
            Some(p) if is_any_platform(p) => None,
            Some(p) => Some(
                p.parse::<Platform>()
                    .map_err(|_| invalid(&table, row.number, "platform", p))?,
            ),
        };
        mappings.push(SkuMapping { platform, sku, msku });
    }
    Ok(mappings)
}

pub fn load_combos<W: Workbook + ?Sized>(
    workbook: &mut W,
) -> Result<Vec<ComboDefinition>, SchemaError> {
    let table = open_table(workbook, COMBO_ALIASES, COMBO_SHEET, COMBO_COL, "Combo")?;
    let combo_col = require(&table, COMBO_COL, "Combo")?;
    let component_cols: Vec<(usize, &'static str)> = COMPONENT_COLUMNS
        .iter()
        .filter_map(|(key, label)| table.column(&[*key]).map(|c| (c, *label)))
        .collect();
    if component_cols.is_empty() {
        return Err(SchemaError::MissingColumn {
            sheet: table.name().to_string(),
            column: "SKU1",
        });
    }

    let mut combos = Vec::with_capacity(table.len());
    for row in table.rows() {
        let raw_combo = row.get(combo_col);
        if raw_combo.is_empty() {
            continue;
        }
        let sku = Sku::new(raw_combo).map_err(|_| invalid(&table, row.number, "Combo", raw_combo))?;
        let mut combo = ComboDefinition::new(sku);
        for (col, label) in &component_cols {
            let cell = row.get(*col);
            if cell.is_empty() {
                continue;
            }
            let (msku, qty) =
                parse_component(cell).ok_or_else(|| invalid(&table, row.number, *label, cell))?;
            combo.add_component(msku, qty);
        }
        // Kept even when empty: resolution must reject it rather than fall through
        // to a direct mapping.
        combos.push(combo);
    }
    Ok(combos)
}

const COMPONENT_COLUMNS: [(&str, &str); MAX_COMPONENTS] = [
    ("sku1", "SKU1"),
    ("sku2", "SKU2"),
    ("sku3", "SKU3"),
    ("sku4", "SKU4"),
    ("sku5", "SKU5"),
    ("sku6", "SKU6"),
    ("sku7", "SKU7"),
    ("sku8", "SKU8"),
    ("sku9", "SKU9"),
    ("sku10", "SKU10"),
    ("sku11", "SKU11"),
    ("sku12", "SKU12"),
    ("sku13", "SKU13"),
    ("sku14", "SKU14"),
];

fn open_table<W: Workbook + ?Sized>(
    workbook: &mut W,
    aliases: &[&str],
    logical_name: &'static str,
    id_aliases: &[&str],
    id_label: &'static str,
) -> Result<Table, SchemaError> {
    let name = find_sheet(workbook, aliases).ok_or(SchemaError::MissingSheet {
        sheet: logical_name,
    })?;
    let sheet: Sheet = workbook.read_sheet(&name)?;
    let header = sheet
        .find_header_row(HEADER_SCAN, |cells| {
            cells.iter().any(|c| id_aliases.contains(&c.as_str()))
        })
        .ok_or_else(|| SchemaError::MissingColumn {
            sheet: name.clone(),
            column: id_label,
        })?;
    tracing::debug!(sheet = %name, header_row = header + 1, "catalog sheet header located");
    Ok(sheet.into_table(header))
}

fn require(table: &Table, aliases: &[&str], label: &'static str) -> Result<usize, SchemaError> {
    table.column(aliases).ok_or_else(|| SchemaError::MissingColumn {
        sheet: table.name().to_string(),
        column: label,
    })
}

fn invalid(table: &Table, row: usize, column: &'static str, value: &str) -> SchemaError {
    SchemaError::InvalidCell {
        sheet: table.name().to_string(),
        row,
        column,
        value: value.to_string(),
    }
}

fn is_any_platform(value: &str) -> bool {
    ["mixed", "all", "any", "*"]
        .iter()
        .any(|v| v.eq_ignore_ascii_case(value))
}

/// Blank stock reads as zero; fractional or negative values are rejected.
fn parse_stock(text: &str) -> Option<i64> {
    if text.is_empty() {
        return Some(0);
    }
    let value = match text.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f = text.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };
    (value >= 0).then_some(value)
}

/// `"M1"` is one unit of M1; `"M1*3"` is three.
fn parse_component(cell: &str) -> Option<(Msku, i64)> {
    let (code, qty) = match cell.rsplit_once('*') {
        Some((code, qty)) => (code, qty.trim().parse::<i64>().ok()?),
        None => (cell, 1),
    };
    let msku = Msku::new(code).ok()?;
    Some((msku, qty))
}
