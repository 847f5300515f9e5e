use wms_core::Platform;

/// Prefix Amazon puts in front of graded-return SKUs.
const AMAZON_GRADED_PREFIX: &str = "amzn.gr.";
/// Flipkart exports wrap SKUs as `"""SKU:ABC"""`.
const FLIPKART_SKU_PREFIX: &str = "sku:";

/// Strip platform-specific decoration from a sold SKU.
///
/// The result may be empty; callers treat that as an unmapped SKU.
pub fn normalize_sku(platform: Platform, raw: &str) -> String {
    let base = strip_quotes(raw);
    let stripped = match platform {
        Platform::Amazon => strip_prefix_ignore_case(base, AMAZON_GRADED_PREFIX),
        Platform::Flipkart => strip_prefix_ignore_case(base, FLIPKART_SKU_PREFIX),
        Platform::Meesho => base,
    };
    strip_quotes(stripped).to_string()
}

fn strip_quotes(s: &str) -> &str {
    s.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> &'a str {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &s[prefix.len()..],
        _ => s,
    }
}
