use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use wms_core::{Msku, Platform, Sku};
use wms_ingest::SalesRecord;
use wms_mapping::ProductKind;

/// Outgoing quantities grouped several ways.
///
/// Quantities are MSKU units (combo rows already expanded), except
/// `orders_by_platform` which counts records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    pub by_msku: BTreeMap<Msku, i64>,
    pub by_platform: BTreeMap<Platform, i64>,
    pub orders_by_platform: BTreeMap<Platform, usize>,
    #[serde(serialize_with = "serialize_days")]
    pub by_day: BTreeMap<Option<NaiveDate>, i64>,
    #[serde(serialize_with = "serialize_combos")]
    pub combo_breakdown: BTreeMap<(Sku, Msku), i64>,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub day: Option<NaiveDate>,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComboUsage {
    pub combo_sku: Sku,
    pub msku: Msku,
    pub quantity: i64,
}

impl SalesSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        let mut summary = Self::default();
        for record in records {
            summary.add(record);
        }
        tracing::debug!(
            records = summary.record_count,
            mskus = summary.by_msku.len(),
            "sales summarised"
        );
        summary
    }

    pub fn add(&mut self, record: &SalesRecord) {
        self.record_count += 1;
        *self.orders_by_platform.entry(record.platform).or_default() += 1;

        let day = record.timestamp.map(|t| t.date());
        for line in &record.lines {
            bump(self.by_msku.entry(line.msku.clone()).or_default(), line.quantity);
            bump(self.by_platform.entry(record.platform).or_default(), line.quantity);
            bump(self.by_day.entry(day).or_default(), line.quantity);
            if record.kind == ProductKind::Combo {
                let key = (record.sku.clone(), line.msku.clone());
                bump(self.combo_breakdown.entry(key).or_default(), line.quantity);
            }
        }
    }

    pub fn total_units(&self) -> i64 {
        self.by_msku.values().fold(0, |acc, q| acc.saturating_add(*q))
    }

    pub fn outgoing(&self, msku: &Msku) -> i64 {
        self.by_msku.get(msku).copied().unwrap_or(0)
    }

    pub fn daily(&self) -> Vec<DailyTotal> {
        self.by_day
            .iter()
            .map(|(day, quantity)| DailyTotal {
                day: *day,
                quantity: *quantity,
            })
            .collect()
    }

    pub fn combos(&self) -> Vec<ComboUsage> {
        self.combo_breakdown
            .iter()
            .map(|((combo_sku, msku), quantity)| ComboUsage {
                combo_sku: combo_sku.clone(),
                msku: msku.clone(),
                quantity: *quantity,
            })
            .collect()
    }
}

/// Totals clamp at the i64 bounds, matching the stock projection.
fn bump(total: &mut i64, quantity: i64) {
    *total = total.saturating_add(quantity);
}

fn serialize_days<S: Serializer>(
    days: &BTreeMap<Option<NaiveDate>, i64>,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.collect_seq(days.iter().map(|(day, quantity)| DailyTotal {
        day: *day,
        quantity: *quantity,
    }))
}

fn serialize_combos<S: Serializer>(
    combos: &BTreeMap<(Sku, Msku), i64>,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.collect_seq(combos.iter().map(|((combo_sku, msku), quantity)| ComboUsage {
        combo_sku: combo_sku.clone(),
        msku: msku.clone(),
        quantity: *quantity,
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use proptest::prelude::*;
    use wms_mapping::ResolvedLine;

    pub(crate) fn record(
        platform: Platform,
        sku: &str,
        kind: ProductKind,
        lines: &[(&str, i64)],
        timestamp: Option<&str>,
    ) -> SalesRecord {
        SalesRecord {
            file_name: "sales.csv".into(),
            row: 2,
            platform,
            raw_sku: sku.into(),
            sku: Sku::new(sku).unwrap(),
            order_qty: 1,
            order_id: None,
            timestamp: timestamp
                .map(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S").unwrap()),
            kind,
            lines: lines
                .iter()
                .map(|(m, q)| ResolvedLine {
                    msku: Msku::new(*m).unwrap(),
                    quantity: *q,
                })
                .collect(),
        }
    }

    #[test]
    fn groups_by_msku_platform_and_day() {
        let records = vec![
            record(
                Platform::Amazon,
                "C1",
                ProductKind::Combo,
                &[("M1", 6), ("M2", 3)],
                Some("2024-03-01 10:00:00"),
            ),
            record(Platform::Flipkart, "S1", ProductKind::Single, &[("M1", 2)], None),
        ];

        let summary = SalesSummary::from_records(&records);
        assert_eq!(summary.by_msku[&Msku::new("M1").unwrap()], 8);
        assert_eq!(summary.by_msku[&Msku::new("M2").unwrap()], 3);
        assert_eq!(summary.by_platform[&Platform::Amazon], 9);
        assert_eq!(summary.by_platform[&Platform::Flipkart], 2);
        assert_eq!(summary.orders_by_platform[&Platform::Amazon], 1);
        assert_eq!(summary.by_day[&None], 2);
        assert_eq!(summary.total_units(), 11);
        assert_eq!(summary.combos().len(), 2);
        assert_eq!(summary.combos()[0].quantity, 6);
    }

    #[test]
    fn serializes_to_json_with_list_shaped_days_and_combos() {
        let records = vec![record(
            Platform::Meesho,
            "C1",
            ProductKind::Combo,
            &[("M1", 2)],
            Some("2024-03-01 10:00:00"),
        )];
        let json = serde_json::to_value(SalesSummary::from_records(&records)).unwrap();
        assert_eq!(json["by_platform"]["meesho"], 2);
        assert_eq!(json["by_day"][0]["day"], "2024-03-01");
        assert_eq!(json["combo_breakdown"][0]["combo_sku"], "C1");
    }

    #[test]
    fn huge_quantities_saturate_instead_of_overflowing() {
        let big = 5_000_000_000_000_000_000;
        let records = vec![
            record(Platform::Amazon, "S1", ProductKind::Single, &[("M1", big)], None),
            record(Platform::Amazon, "S1", ProductKind::Single, &[("M1", big)], None),
        ];

        let summary = SalesSummary::from_records(&records);
        assert_eq!(summary.outgoing(&Msku::new("M1").unwrap()), i64::MAX);
        assert_eq!(summary.by_platform[&Platform::Amazon], i64::MAX);
        assert_eq!(summary.by_day[&None], i64::MAX);
        assert_eq!(summary.total_units(), i64::MAX);
    }

    fn shuffled_pair() -> impl Strategy<Value = (Vec<(usize, i64)>, Vec<(usize, i64)>)> {
        prop::collection::vec((0usize..4, 1i64..50), 0..30)
            .prop_flat_map(|rows| (Just(rows.clone()), Just(rows).prop_shuffle()))
    }

    fn records_from(rows: &[(usize, i64)]) -> Vec<SalesRecord> {
        rows.iter()
            .map(|(m, q)| {
                let msku = format!("M{m}");
                record(Platform::ALL[*m % 3], &msku, ProductKind::Single, &[(msku.as_str(), *q)], None)
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn aggregation_is_order_independent((rows, shuffled) in shuffled_pair()) {
            prop_assert_eq!(
                SalesSummary::from_records(&records_from(&rows)),
                SalesSummary::from_records(&records_from(&shuffled))
            );
        }
    }
}
