//! Endpoint construction for the text-generation API.

const API_VERSION: &str = "v1beta2";

/// Normalize a configured host into a base URL without a trailing slash.
///
/// Bare host names get an `https://` scheme. Hosts that already carry a
/// scheme are kept as-is, which lets tests and local proxies point at plain
/// HTTP servers.
///
/// ```
/// use codegpt::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("generativelanguage.googleapis.com"),
///     "https://generativelanguage.googleapis.com"
/// );
/// assert_eq!(normalize_base_url("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
/// ```
pub fn normalize_base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Build the `generateText` endpoint for `model` on `host`.
///
/// The API key is not part of the returned URL; callers attach it as the
/// `key` query parameter so it is percent-encoded.
///
/// ```
/// use codegpt::utils::url::generate_text_url;
///
/// assert_eq!(
///     generate_text_url("generativelanguage.googleapis.com", "text-bison-001"),
///     "https://generativelanguage.googleapis.com/v1beta2/models/text-bison-001:generateText"
/// );
/// ```
pub fn generate_text_url(host: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    format!(
        "{}/{API_VERSION}/models/{model}:generateText",
        normalize_base_url(host)
    )
}
