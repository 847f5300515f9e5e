use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::query::{CannedQuery, ChartKind};

/// Tabular answer to a question.
///
/// Read-only output: computed from reports, never written back anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub query: CannedQuery,
    pub title: String,
    pub chart: ChartKind,
    pub columns: Vec<String>,
    /// One JSON array per row, aligned with `columns`.
    pub rows: Vec<Vec<JsonValue>>,
}

impl QueryAnswer {
    pub fn new(query: CannedQuery) -> Self {
        Self {
            query,
            title: query.title(),
            chart: query.chart(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn push_row(&mut self, row: Vec<JsonValue>) {
        self.rows.push(row);
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("question is empty")]
    EmptyQuestion,
}
