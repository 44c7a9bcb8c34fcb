//! Symbol Normalization
//!
//! Several rollups settle in ETH, so exchanges list their deposits under the
//! ETH ticker rather than the chain's own symbol.

/// (canonical symbol, exchange ticker)
const OVERRIDES: &[(&str, &str)] = &[
    ("BASE", "ETH"),
    ("LINEA", "ETH"),
    ("SCROLL", "ETH"),
];

/// Map a canonical symbol to the ticker exchanges list it under.
///
/// Falls through to the input when there is no override.
pub fn normalize(symbol: &str) -> &str {
    OVERRIDES
        .iter()
        .find(|(canonical, _)| canonical.eq_ignore_ascii_case(symbol))
        .map_or(symbol, |&(_, ticker)| ticker)
}
