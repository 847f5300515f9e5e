//! `wms-ai`
//!
//! Canned question answering over sales and stock reports.
//!
//! There is no language model here: a fixed phrase table picks one of a few
//! canned queries, which are then evaluated against the pure reports from
//! `wms-reporting`. Nothing in this crate mutates stock.

pub mod answer;
pub mod insight;
pub mod query;
pub mod result;

pub use answer::answer;
pub use insight::{Insight, InsightKind, insights};
pub use query::{CannedQuery, ChartKind, classify};
pub use result::{QueryAnswer, QueryError};
