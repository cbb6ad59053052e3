use urlencoding::encode;

/// Percent-encode key/value pairs into `a=1&b=2` form, preserving order.
pub fn build_query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
