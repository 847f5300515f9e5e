use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use wms_mapping::SkuResolver;
use wms_sheets::{Row, Sheet, read_first_sheet};

use crate::error::IngestError;
use crate::platform::{PlatformLayout, detect_platform};
use crate::record::{IngestReport, RowError, RowFailure, SalesRecord};

/// Leading rows searched for a recognisable header.
const HEADER_SCAN: usize = 5;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%b %d, %Y"];

/// Per-file sales ingestion.
///
/// Platform detection is file-level: an unrecognised header rejects the file
/// before any row is looked at. Row-level failures never abort the file.
#[derive(Debug, Clone)]
pub struct Ingestor {
    resolver: SkuResolver,
}

struct Columns {
    sku: usize,
    quantity: Option<usize>,
    order_id: Option<usize>,
    date: Option<usize>,
}

impl Ingestor {
    pub fn new(resolver: SkuResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &SkuResolver {
        &self.resolver
    }

    /// Read a CSV or workbook export from disk and ingest it.
    pub fn ingest_path(&self, path: impl AsRef<Path>) -> Result<IngestReport, IngestError> {
        let path = path.as_ref();
        let mut sheet = read_first_sheet(path)?;
        if let Some(name) = path.file_name() {
            sheet.name = name.to_string_lossy().into_owned();
        }
        self.ingest_sheet(sheet)
    }

    /// Ingest an already-read sheet; `sheet.name` is used as the file name.
    pub fn ingest_sheet(&self, sheet: Sheet) -> Result<IngestReport, IngestError> {
        let file_name = sheet.name.clone();
        let header_row = sheet
            .find_header_row(HEADER_SCAN, |cells| detect_platform(cells).is_some())
            .ok_or_else(|| IngestError::UnknownPlatform {
                file: file_name.clone(),
            })?;
        let table = sheet.into_table(header_row);
        let layout = detect_platform(&table.normalized_headers()).ok_or_else(|| {
            IngestError::UnknownPlatform {
                file: file_name.clone(),
            }
        })?;
        let columns = resolve_columns(&file_name, layout, |aliases| table.column(aliases))?;

        let span = tracing::info_span!("ingest", file = %file_name, platform = %layout.platform);
        let _guard = span.enter();

        let mut report = IngestReport {
            batch_id: Uuid::now_v7(),
            file_name: file_name.clone(),
            platform: layout.platform,
            total_rows: 0,
            records: Vec::new(),
            errors: Vec::new(),
        };

        for row in table.rows() {
            if row.is_blank() {
                continue;
            }
            report.total_rows += 1;
            match self.ingest_row(&file_name, layout, &columns, &row) {
                Ok(record) => report.records.push(record),
                Err(error) => {
                    let raw_sku = row.get(columns.sku).to_string();
                    tracing::warn!(row = row.number, sku = %raw_sku, %error, "row rejected");
                    report.errors.push(RowFailure {
                        row: row.number,
                        raw_sku,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            batch_id = %report.batch_id,
            rows = report.total_rows,
            accepted = report.records.len(),
            rejected = report.errors.len(),
            "sales file ingested"
        );
        Ok(report)
    }

    fn ingest_row(
        &self,
        file_name: &str,
        layout: &PlatformLayout,
        columns: &Columns,
        row: &Row<'_>,
    ) -> Result<SalesRecord, RowError> {
        let raw_sku = row.get(columns.sku);
        if raw_sku.is_empty() {
            return Err(RowError::MissingSku);
        }

        // Exports without a quantity column carry one unit per row.
        let order_qty = match columns.quantity {
            Some(col) => parse_quantity(row.get(col)).ok_or_else(|| RowError::InvalidQuantity {
                value: row.get(col).to_string(),
            })?,
            None => 1,
        };

        let resolution = self
            .resolver
            .resolve_detailed(layout.platform, raw_sku, order_qty)?;

        let timestamp = row.get_opt(columns.date).and_then(|text| {
            let parsed = parse_timestamp(text);
            if parsed.is_none() {
                tracing::debug!(row = row.number, value = text, "unrecognised date; leaving empty");
            }
            parsed
        });

        Ok(SalesRecord {
            file_name: file_name.to_string(),
            row: row.number,
            platform: layout.platform,
            raw_sku: raw_sku.to_string(),
            sku: resolution.sku,
            order_qty,
            order_id: row.get_opt(columns.order_id).map(str::to_string),
            timestamp,
            kind: resolution.kind,
            lines: resolution.lines,
        })
    }
}

fn resolve_columns<F>(file: &str, layout: &PlatformLayout, column: F) -> Result<Columns, IngestError>
where
    F: Fn(&[&str]) -> Option<usize>,
{
    let sku = column(layout.sku).ok_or_else(|| IngestError::MissingColumn {
        file: file.to_string(),
        platform: layout.platform,
        column: layout.sku[0],
    })?;
    Ok(Columns {
        sku,
        quantity: column(layout.quantity),
        order_id: column(layout.order_id),
        date: column(layout.date),
    })
}

/// Whole numbers only; `"2.0"` is accepted as spreadsheets tend to write it.
fn parse_quantity(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(v) = text.parse::<i64>() {
        return Some(v);
    }
    let f = text.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15).then_some(f as i64)
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use wms_catalog::{Catalog, ComboComponent, ComboDefinition, Product, SkuMapping};
    use wms_core::{Msku, Platform, Sku};
    use wms_mapping::{ProductKind, ResolveError};
    use wms_sheets::read_csv;

    use crate::record::IngestStatus;

    fn ingestor() -> Ingestor {
        let m = |s: &str| Msku::new(s).unwrap();
        let products = vec![
            Product { msku: m("M1"), description: "One".into(), stock: 10, location: String::new() },
            Product { msku: m("M2"), description: "Two".into(), stock: 2, location: String::new() },
        ];
        let mappings = vec![
            SkuMapping { platform: None, sku: Sku::new("S1").unwrap(), msku: m("M1") },
            SkuMapping { platform: None, sku: Sku::new("X001").unwrap(), msku: m("M2") },
        ];
        let combos = vec![ComboDefinition {
            sku: Sku::new("C1").unwrap(),
            components: vec![
                ComboComponent { msku: m("M1"), quantity: 2 },
                ComboComponent { msku: m("M2"), quantity: 1 },
            ],
        }];
        let catalog = Catalog::from_parts(products, mappings, combos).unwrap();
        Ingestor::new(SkuResolver::new(Arc::new(catalog)))
    }

    fn sheet(name: &str, csv: &str) -> Sheet {
        read_csv(name, csv.as_bytes()).unwrap()
    }

    #[test]
    fn amazon_combo_row_expands() {
        let report = ingestor()
            .ingest_sheet(sheet(
                "amazon.csv",
                "Date,FNSKU,Quantity,Reference ID\n2024-02-04,C1,3,REF-1\n",
            ))
            .unwrap();

        assert_eq!(report.platform, Platform::Amazon);
        assert_eq!(report.status(), IngestStatus::Success);
        let record = &report.records[0];
        assert_eq!(record.kind, ProductKind::Combo);
        assert_eq!(record.order_id.as_deref(), Some("REF-1"));
        assert_eq!(record.row, 2);
        assert_eq!(record.units(), 9);
        assert_eq!(
            record.timestamp,
            NaiveDate::from_ymd_opt(2024, 2, 4).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
    }

    #[test]
    fn unmapped_row_is_reported_and_rest_processed() {
        let report = ingestor()
            .ingest_sheet(sheet(
                "meesho.csv",
                "Sub Order No,SKU,Quantity\n1,S1,1\n2,GHOST,4\n3,X001,2\n",
            ))
            .unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.status(), IngestStatus::Partial);

        let failure = &report.errors[0];
        assert_eq!(failure.row, 3);
        assert_eq!(failure.raw_sku, "GHOST");
        assert!(matches!(
            failure.error,
            RowError::Resolve(ResolveError::UnmappedSku { .. })
        ));
    }

    #[test]
    fn windows_1252_product_name_keeps_other_rows() {
        let mut data = b"Sub Order No,SKU,Product Name,Quantity\n1,S1,Mug,1\n2,X001,Caf".to_vec();
        data.push(0xE9);
        data.extend_from_slice(b",2\n3,S1,Lid,3\n");
        let report = ingestor()
            .ingest_sheet(read_csv("meesho.csv", data.as_slice()).unwrap())
            .unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.status(), IngestStatus::Success);
        assert_eq!(report.records[1].lines[0].quantity, 2);
    }

    #[test]
    fn unknown_header_rejects_whole_file() {
        let err = ingestor()
            .ingest_sheet(sheet("mystery.csv", "Item,Count\nS1,1\n"))
            .unwrap_err();
        match err {
            IngestError::UnknownPlatform { file } => assert_eq!(file, "mystery.csv"),
            other => panic!("expected UnknownPlatform, got {other:?}"),
        }
    }

    #[test]
    fn flipkart_export_without_sku_column_is_rejected() {
        let err = ingestor()
            .ingest_sheet(sheet("fk.csv", "Order Item ID,FSN,Quantity\n1,F,1\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn { platform: Platform::Flipkart, column: "sku", .. }
        ));
    }

    #[test]
    fn blank_sku_and_bad_quantity_are_reported_not_dropped() {
        let report = ingestor()
            .ingest_sheet(sheet(
                "fk.csv",
                "Order Item ID,SKU,Quantity\n1,,1\n2,S1,two\n3,\"\"\"SKU:S1\"\"\",1.0\n,,\n",
            ))
            .unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.errors[0].error, RowError::MissingSku);
        assert_eq!(
            report.errors[1].error,
            RowError::InvalidQuantity { value: "two".into() }
        );
        assert_eq!(report.records[0].sku.as_str(), "S1");
    }

    #[test]
    fn missing_quantity_column_means_one_unit() {
        let report = ingestor()
            .ingest_sheet(sheet("m.csv", "Sub Order No,SKU\n9,S1\n"))
            .unwrap();
        assert_eq!(report.records[0].order_qty, 1);
    }

    #[test]
    fn header_below_a_title_row_is_found() {
        let report = ingestor()
            .ingest_sheet(sheet(
                "m.csv",
                "Meesho orders export,,\nSub Order No,SKU,Quantity\n1,S1,2\n",
            ))
            .unwrap();
        assert_eq!(report.records[0].row, 3);
    }

    #[test]
    fn timestamps_parse_common_forms() {
        assert!(parse_timestamp("2024-02-04T10:00:00+05:30").is_some());
        assert!(parse_timestamp("04-02-2024 10:15").is_some());
        assert!(parse_timestamp("04/02/2024").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
