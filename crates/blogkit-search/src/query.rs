//! The `?q=` parameter that makes searches linkable.

use url::Url;

pub const QUERY_PARAM: &str = "q";

/// Write `value` into `q`, keeping any other parameters.
pub fn set_query(url: &mut Url, value: &str) {
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != QUERY_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut().clear().extend_pairs(others).append_pair(QUERY_PARAM, value);
}

/// Decoded `q`, if present and non-empty.
pub fn read_query(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == QUERY_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Query to run on page load; falls back to `default` and writes it back.
pub fn initial_query(url: &mut Url, default: &str) -> String {
    match read_query(url) {
        Some(q) => q,
        None => {
            set_query(url, default);
            default.to_string()
        }
    }
}
