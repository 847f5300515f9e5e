//! Header and sheet-name normalisation.

/// Normalise a sheet name or column header for lookup.
///
/// Trims, collapses runs of inner whitespace into one space and lowercases, so
/// `"Current Inventory "` and `"current  inventory"` compare equal.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
