use std::collections::BTreeMap;

use serde::Serialize;

use wms_catalog::Catalog;
use wms_core::Msku;

use crate::summary::SalesSummary;

/// Advisory flag: this MSKU would be out of stock (or worse) after the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockWarning {
    pub msku: Msku,
    pub current_stock: i64,
    pub outgoing: i64,
    pub projected: i64,
}

impl std::fmt::Display for LowStockWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: stock {} - outgoing {} = {}",
            self.msku, self.current_stock, self.outgoing, self.projected
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockRow {
    pub msku: Msku,
    pub description: String,
    pub location: String,
    pub current_stock: i64,
    pub outgoing: i64,
    pub projected: i64,
    /// False for MSKUs that were sold but are missing from the inventory sheet.
    pub in_catalog: bool,
    pub warning: Option<LowStockWarning>,
}

/// Flat row handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub msku: Msku,
    pub total_qty: i64,
    pub warning: bool,
}

/// Current stock against aggregated outgoing quantity, one row per MSKU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StockReport {
    rows: Vec<StockRow>,
}

impl StockReport {
    /// Rows cover every catalog MSKU plus any sold MSKU the catalog lacks,
    /// sorted by MSKU.
    pub fn project(catalog: &Catalog, summary: &SalesSummary) -> Self {
        let mut rows: BTreeMap<Msku, StockRow> = catalog
            .products()
            .map(|p| {
                let row = StockRow {
                    msku: p.msku.clone(),
                    description: p.description.clone(),
                    location: p.location.clone(),
                    current_stock: p.stock,
                    outgoing: 0,
                    projected: p.stock,
                    in_catalog: true,
                    warning: None,
                };
                (p.msku.clone(), row)
            })
            .collect();

        for (msku, qty) in &summary.by_msku {
            let row = rows.entry(msku.clone()).or_insert_with(|| StockRow {
                msku: msku.clone(),
                description: String::new(),
                location: String::new(),
                current_stock: 0,
                outgoing: 0,
                projected: 0,
                in_catalog: false,
                warning: None,
            });
            row.outgoing = row.outgoing.saturating_add(*qty);
        }

        let mut rows: Vec<StockRow> = rows.into_values().collect();
        for row in &mut rows {
            row.projected = row.current_stock.saturating_sub(row.outgoing);
            if row.projected <= 0 {
                let warning = LowStockWarning {
                    msku: row.msku.clone(),
                    current_stock: row.current_stock,
                    outgoing: row.outgoing,
                    projected: row.projected,
                };
                tracing::warn!(%warning, in_catalog = row.in_catalog, "low stock");
                row.warning = Some(warning);
            }
        }

        Self { rows }
    }

    pub fn stock_rows(&self) -> &[StockRow] {
        &self.rows
    }

    pub fn get(&self, msku: &Msku) -> Option<&StockRow> {
        self.rows
            .binary_search_by(|r| r.msku.cmp(msku))
            .ok()
            .map(|i| &self.rows[i])
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LowStockWarning> {
        self.rows.iter().filter_map(|r| r.warning.as_ref())
    }

    /// `msku -> -outgoing` for every MSKU with outgoing stock.
    pub fn deltas(&self) -> BTreeMap<Msku, i64> {
        self.rows
            .iter()
            .filter(|r| r.outgoing > 0)
            .map(|r| (r.msku.clone(), -r.outgoing))
            .collect()
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        self.rows
            .iter()
            .map(|r| ReportRow {
                msku: r.msku.clone(),
                total_qty: r.outgoing,
                warning: r.warning.is_some(),
            })
            .collect()
    }

    /// The `n` MSKUs with the highest outgoing quantity. Ties break by MSKU.
    pub fn top_sellers(&self, n: usize) -> Vec<&StockRow> {
        let mut sold: Vec<&StockRow> = self.rows.iter().filter(|r| r.outgoing > 0).collect();
        sold.sort_by(|a, b| b.outgoing.cmp(&a.outgoing).then_with(|| a.msku.cmp(&b.msku)));
        sold.truncate(n);
        sold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::tests::record;
    use wms_catalog::{ComboDefinition, Product};
    use wms_core::{Platform, Sku};
    use wms_mapping::ProductKind;

    fn msku(s: &str) -> Msku {
        Msku::new(s).unwrap()
    }

    fn product(id: &str, stock: i64) -> Product {
        Product {
            msku: msku(id),
            description: format!("{id} item"),
            stock,
            location: String::new(),
        }
    }

    fn catalog() -> Catalog {
        let mut combo = ComboDefinition::new(Sku::new("C1").unwrap());
        combo.add_component(msku("M1"), 2);
        combo.add_component(msku("M2"), 1);
        Catalog::from_parts(
            vec![product("M1", 10), product("M2", 2), product("M3", 0)],
            Vec::new(),
            vec![combo],
        )
        .unwrap()
    }

    #[test]
    fn combo_sale_projects_stock_and_flags_shortfall() {
        let records = vec![record(
            Platform::Amazon,
            "C1",
            ProductKind::Combo,
            &[("M1", 6), ("M2", 3)],
            None,
        )];
        let report = StockReport::project(&catalog(), &SalesSummary::from_records(&records));

        let m1 = report.get(&msku("M1")).unwrap();
        assert_eq!(m1.projected, 4);
        assert!(m1.warning.is_none());

        let m2 = report.get(&msku("M2")).unwrap();
        assert_eq!(m2.projected, -1);
        assert_eq!(m2.warning.as_ref().map(|w| w.projected), Some(-1));
    }

    #[test]
    fn zero_projection_counts_as_low_stock() {
        let report = StockReport::project(&catalog(), &SalesSummary::default());
        let flagged: Vec<&Msku> = report.warnings().map(|w| &w.msku).collect();
        assert_eq!(flagged, vec![&msku("M3")]);
    }

    #[test]
    fn sold_msku_missing_from_catalog_gets_its_own_row() {
        let records = vec![record(Platform::Meesho, "X", ProductKind::Single, &[("GHOST", 1)], None)];
        let report = StockReport::project(&catalog(), &SalesSummary::from_records(&records));

        let ghost = report.get(&msku("ghost")).unwrap();
        assert!(!ghost.in_catalog);
        assert_eq!(ghost.projected, -1);
        let order: Vec<&str> = report.stock_rows().iter().map(|r| r.msku.as_str()).collect();
        assert_eq!(order, vec!["GHOST", "M1", "M2", "M3"]);
    }

    #[test]
    fn deltas_rows_and_top_sellers() {
        let records = vec![
            record(Platform::Amazon, "C1", ProductKind::Combo, &[("M1", 6), ("M2", 3)], None),
            record(Platform::Flipkart, "S3", ProductKind::Single, &[("M2", 3)], None),
        ];
        let report = StockReport::project(&catalog(), &SalesSummary::from_records(&records));

        assert_eq!(
            report.deltas(),
            BTreeMap::from([(msku("M1"), -6), (msku("M2"), -6)])
        );

        let rows = report.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].total_qty, 6);
        assert!(!rows[0].warning);
        assert!(rows[1].warning);

        let top: Vec<&str> = report.top_sellers(1).iter().map(|r| r.msku.as_str()).collect();
        assert_eq!(top, vec!["M1"]);
    }
}
