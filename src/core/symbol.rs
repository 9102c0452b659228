//! Symbol format translation between URL routes and display labels.
//!
//! The upstream API reports pair symbols with a slash (`BTC/USD`), which is
//! not usable as a URL path segment. Route paths use a dash (`BTC-USD`)
//! instead. Only the first separator is substituted; the codec does not
//! validate symbol shape.

/// Convert a display symbol to its route form.
///
/// `"BTC/USD"` becomes `"BTC-USD"`. Inputs with extra slashes keep them:
/// `"BTC/USD/EXTRA"` becomes `"BTC-USD/EXTRA"`.
pub fn route_form(symbol: &str) -> String {
    symbol.replacen('/', "-", 1)
}

/// Convert a route symbol back to its display form.
///
/// `"BTC-USD"` becomes `"BTC/USD"`.
pub fn display_form(route: &str) -> String {
    route.replacen('-', "/", 1)
}
