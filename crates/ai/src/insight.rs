use serde::{Deserialize, Serialize};

use wms_reporting::{SalesSummary, StockReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Info,
}

/// One-line dashboard observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

/// Fixed set of observations: best seller, stock alert, leading platform.
///
/// Each one is only produced when there is data behind it.
pub fn insights(summary: &SalesSummary, stock: &StockReport) -> Vec<Insight> {
    let mut out = Vec::new();

    if let Some(top) = stock.top_sellers(1).first() {
        let name = if top.description.is_empty() {
            top.msku.as_str()
        } else {
            top.description.as_str()
        };
        out.push(Insight {
            kind: InsightKind::Success,
            title: "Top Performer".to_string(),
            message: format!("{name} is your best seller with {} units sold", top.outgoing),
        });
    }

    let shortfalls = stock.warnings().filter(|w| w.projected < 0).count();
    let low = stock.warnings().count();
    if low > 0 {
        out.push(Insight {
            kind: InsightKind::Warning,
            title: "Stock Alert".to_string(),
            message: format!(
                "{low} products are out of stock after this batch, {shortfalls} of them oversold"
            ),
        });
    }

    let best_platform = summary
        .by_platform
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)));
    if let Some((platform, units)) = best_platform {
        out.push(Insight {
            kind: InsightKind::Info,
            title: "Platform Performance".to_string(),
            message: format!("{platform} is your top platform with {units} units sold"),
        });
    }

    out
}
