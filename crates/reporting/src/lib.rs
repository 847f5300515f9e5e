//! Pure reductions over resolved sales records.
//!
//! Nothing here touches a store: [`StockReport::deltas`] is what callers hand
//! to `wms_inventory::apply_deltas` when they want to commit the projection.

pub mod stock;
pub mod summary;

pub use stock::{LowStockWarning, ReportRow, StockReport, StockRow};
pub use summary::{ComboUsage, DailyTotal, SalesSummary};
