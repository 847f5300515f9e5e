//! Header fingerprints and column layouts of the supported sales exports.

use wms_core::Platform;

/// Where to find things in one platform's export (normalised header names).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformLayout {
    pub platform: Platform,
    /// Any of these headers identifies the platform.
    pub fingerprints: &'static [&'static str],
    pub sku: &'static [&'static str],
    pub quantity: &'static [&'static str],
    pub order_id: &'static [&'static str],
    pub date: &'static [&'static str],
}

/// Checked in order; the first match wins when headers fit several platforms.
pub const LAYOUTS: [PlatformLayout; 3] = [
    PlatformLayout {
        platform: Platform::Amazon,
        fingerprints: &["fnsku", "fulfillment center"],
        sku: &["fnsku", "msku"],
        quantity: &["quantity"],
        order_id: &["reference id", "order id"],
        date: &["date", "order date"],
    },
    PlatformLayout {
        platform: Platform::Flipkart,
        fingerprints: &["order item id", "fsn"],
        sku: &["sku"],
        quantity: &["quantity", "item quantity"],
        order_id: &["order id"],
        date: &["order date"],
    },
    PlatformLayout {
        platform: Platform::Meesho,
        fingerprints: &["sub order no"],
        sku: &["sku"],
        quantity: &["quantity"],
        order_id: &["sub order no"],
        date: &["order date"],
    },
];

/// Detect the platform from a set of normalised header names.
pub fn detect_platform(headers: &[String]) -> Option<&'static PlatformLayout> {
    LAYOUTS.iter().find(|layout| {
        layout
            .fingerprints
            .iter()
            .any(|f| headers.iter().any(|h| h == f))
    })
}
