use serde_json::json;

use wms_reporting::{SalesSummary, StockReport};

use crate::query::{CannedQuery, classify};
use crate::result::{QueryAnswer, QueryError};

/// Answer `question` from already computed reports.
pub fn answer(
    question: &str,
    summary: &SalesSummary,
    stock: &StockReport,
) -> Result<QueryAnswer, QueryError> {
    let query = classify(question)?;
    let answer = run(query, summary, stock);
    tracing::info!(?query, rows = answer.rows.len(), "question answered");
    Ok(answer)
}

fn run(query: CannedQuery, summary: &SalesSummary, stock: &StockReport) -> QueryAnswer {
    match query {
        CannedQuery::TopSelling { limit } => {
            let mut answer =
                QueryAnswer::new(query).with_columns(&["msku", "description", "total_sold"]);
            for row in stock.top_sellers(limit) {
                answer.push_row(vec![
                    json!(row.msku),
                    json!(row.description),
                    json!(row.outgoing),
                ]);
            }
            answer
        }
        CannedQuery::LowStock => {
            let mut answer = QueryAnswer::new(query).with_columns(&[
                "msku",
                "current_stock",
                "outgoing",
                "projected",
            ]);
            let mut low: Vec<_> = stock.warnings().collect();
            low.sort_by(|a, b| a.projected.cmp(&b.projected).then_with(|| a.msku.cmp(&b.msku)));
            for w in low {
                answer.push_row(vec![
                    json!(w.msku),
                    json!(w.current_stock),
                    json!(w.outgoing),
                    json!(w.projected),
                ]);
            }
            answer
        }
        CannedQuery::PlatformSales => {
            let mut answer = QueryAnswer::new(query).with_columns(&[
                "platform",
                "order_count",
                "total_quantity",
            ]);
            let mut platforms: Vec<_> = summary.by_platform.iter().collect();
            platforms.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (platform, quantity) in platforms {
                let orders = summary.orders_by_platform.get(platform).copied().unwrap_or(0);
                answer.push_row(vec![
                    json!(platform.as_str()),
                    json!(orders),
                    json!(quantity),
                ]);
            }
            answer
        }
        CannedQuery::NegativeStock => {
            let mut answer = QueryAnswer::new(query).with_columns(&[
                "msku",
                "current_stock",
                "projected",
                "in_catalog",
            ]);
            let mut negative: Vec<_> = stock
                .stock_rows()
                .iter()
                .filter(|r| r.projected < 0)
                .collect();
            negative.sort_by(|a, b| a.projected.cmp(&b.projected).then_with(|| a.msku.cmp(&b.msku)));
            for row in negative {
                answer.push_row(vec![
                    json!(row.msku),
                    json!(row.current_stock),
                    json!(row.projected),
                    json!(row.in_catalog),
                ]);
            }
            answer
        }
        CannedQuery::ComboBreakdown => {
            let mut answer =
                QueryAnswer::new(query).with_columns(&["combo_sku", "msku", "quantity"]);
            for usage in summary.combos() {
                answer.push_row(vec![
                    json!(usage.combo_sku),
                    json!(usage.msku),
                    json!(usage.quantity),
                ]);
            }
            answer
        }
        CannedQuery::ProductCount => {
            let count = stock.stock_rows().iter().filter(|r| r.in_catalog).count();
            let mut answer = QueryAnswer::new(query).with_columns(&["total_products"]);
            answer.push_row(vec![json!(count)]);
            answer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ChartKind;
    use std::sync::Arc;
    use wms_catalog::{Catalog, ComboDefinition, Product, SkuMapping};
    use wms_core::{Msku, Platform, Sku};
    use wms_ingest::SalesRecord;
    use wms_mapping::SkuResolver;

    fn fixture() -> (SalesSummary, StockReport) {
        let product = |id: &str, stock| Product {
            msku: Msku::new(id).unwrap(),
            description: format!("{id} item"),
            stock,
            location: String::new(),
        };
        let mut combo = ComboDefinition::new(Sku::new("C1").unwrap());
        combo.add_component(Msku::new("M1").unwrap(), 2);
        combo.add_component(Msku::new("M2").unwrap(), 1);
        let catalog = Catalog::from_parts(
            vec![product("M1", 10), product("M2", 2), product("M3", 5)],
            vec![SkuMapping {
                platform: None,
                sku: Sku::new("S3").unwrap(),
                msku: Msku::new("M3").unwrap(),
            }],
            vec![combo],
        )
        .unwrap();
        let resolver = SkuResolver::new(Arc::new(catalog.clone()));

        let sale = |platform, sku: &str, qty| {
            let resolution = resolver.resolve_detailed(platform, sku, qty).unwrap();
            SalesRecord {
                file_name: "t.csv".into(),
                row: 2,
                platform,
                raw_sku: sku.into(),
                sku: resolution.sku,
                order_qty: qty,
                order_id: None,
                timestamp: None,
                kind: resolution.kind,
                lines: resolution.lines,
            }
        };
        let records = vec![sale(Platform::Amazon, "C1", 3), sale(Platform::Meesho, "S3", 1)];
        let summary = SalesSummary::from_records(&records);
        let stock = StockReport::project(&catalog, &summary);
        (summary, stock)
    }

    #[test]
    fn top_selling_orders_by_quantity() {
        let (summary, stock) = fixture();
        let answer = answer("top selling products", &summary, &stock).unwrap();
        assert_eq!(answer.chart, ChartKind::Bar);
        assert_eq!(answer.rows[0][0], json!("M1"));
        assert_eq!(answer.rows[0][2], json!(6));
        assert_eq!(answer.rows.len(), 3);
    }

    #[test]
    fn low_and_negative_stock_use_projection() {
        let (summary, stock) = fixture();
        let low = answer("low stock", &summary, &stock).unwrap();
        assert_eq!(low.rows, vec![vec![json!("M2"), json!(2), json!(3), json!(-1)]]);

        let negative = answer("any shortage?", &summary, &stock).unwrap();
        assert_eq!(negative.rows.len(), 1);
        assert_eq!(negative.rows[0][0], json!("M2"));
    }

    #[test]
    fn platform_sales_and_combo_breakdown() {
        let (summary, stock) = fixture();
        let platforms = answer("sales per platform", &summary, &stock).unwrap();
        assert_eq!(platforms.rows[0], vec![json!("Amazon"), json!(1), json!(9)]);
        assert_eq!(platforms.rows[1], vec![json!("Meesho"), json!(1), json!(1)]);

        let combos = answer("combo", &summary, &stock).unwrap();
        assert_eq!(combos.rows.len(), 2);
        assert_eq!(combos.rows[1], vec![json!("C1"), json!("M2"), json!(3)]);
    }

    #[test]
    fn fallback_counts_catalog_products() {
        let (summary, stock) = fixture();
        let count = answer("how are we doing", &summary, &stock).unwrap();
        assert_eq!(count.chart, ChartKind::Metric);
        assert_eq!(count.rows, vec![vec![json!(3)]]);
    }
}
