use serde::{Deserialize, Serialize};

use crate::result::QueryError;

const TOP_LIMIT: usize = 10;

/// How a presentation layer should draw an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
    Table,
    Metric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CannedQuery {
    TopSelling { limit: usize },
    LowStock,
    PlatformSales,
    NegativeStock,
    ComboBreakdown,
    ProductCount,
}

impl CannedQuery {
    pub fn title(&self) -> String {
        match self {
            CannedQuery::TopSelling { limit } => format!("Top {limit} Selling Products"),
            CannedQuery::LowStock => "Low Stock Products".to_string(),
            CannedQuery::PlatformSales => "Sales by Platform".to_string(),
            CannedQuery::NegativeStock => "Products with Negative Stock".to_string(),
            CannedQuery::ComboBreakdown => "Combo Component Usage".to_string(),
            CannedQuery::ProductCount => "Total Products".to_string(),
        }
    }

    pub fn chart(&self) -> ChartKind {
        match self {
            CannedQuery::TopSelling { .. } => ChartKind::Bar,
            CannedQuery::PlatformSales => ChartKind::Pie,
            CannedQuery::LowStock | CannedQuery::NegativeStock | CannedQuery::ComboBreakdown => {
                ChartKind::Table
            }
            CannedQuery::ProductCount => ChartKind::Metric,
        }
    }
}

fn mentions(question: &str, words: &[&str]) -> bool {
    words.iter().any(|w| question.contains(w))
}

/// Map a free-text question onto a canned query. First matching rule wins.
pub fn classify(question: &str) -> Result<CannedQuery, QueryError> {
    let q = question.trim().to_lowercase();
    if q.is_empty() {
        return Err(QueryError::EmptyQuestion);
    }

    let query = if mentions(&q, &["top", "best", "highest", "most"])
        && mentions(&q, &["sell", "sold", "sales"])
    {
        CannedQuery::TopSelling { limit: TOP_LIMIT }
    } else if mentions(&q, &["low stock", "stock level", "inventory"]) {
        CannedQuery::LowStock
    } else if mentions(&q, &["platform", "amazon", "flipkart", "meesho"]) {
        CannedQuery::PlatformSales
    } else if mentions(&q, &["negative", "shortage"]) {
        CannedQuery::NegativeStock
    } else if q.contains("combo") {
        CannedQuery::ComboBreakdown
    } else {
        CannedQuery::ProductCount
    };

    tracing::debug!(question = %q, ?query, "question classified");
    Ok(query)
}
