use std::io::Write;

use wms_mapping::ProductKind;

use crate::record::SalesRecord;

const HEADER: [&str; 7] = [
    "row",
    "order_id",
    "platform",
    "original_sku",
    "msku",
    "quantity",
    "product_type",
];

/// Write resolved records as CSV, one line per resolved MSKU.
pub fn write_mapped_csv<W: Write>(records: &[SalesRecord], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for record in records {
        let product_type = match record.kind {
            ProductKind::Single => "Single",
            ProductKind::Combo => "Combo_Component",
        };
        let row = record.row.to_string();
        let platform = record.platform.to_string();
        for line in &record.lines {
            let quantity = line.quantity.to_string();
            wtr.write_record([
                row.as_str(),
                record.order_id.as_deref().unwrap_or(""),
                platform.as_str(),
                record.raw_sku.as_str(),
                line.msku.as_str(),
                quantity.as_str(),
                product_type,
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
