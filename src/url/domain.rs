use url::Url;

const HTTP_SCHEME: &str = "http://";

/// Extracts the cookie-scoping domain from a host string
///
/// The host may carry an `http://` prefix and a trailing path. The result is
/// the last two dot-separated labels of what remains, so `a.b.example.com`
/// becomes `example.com`. A host with fewer than two dots is returned as-is.
///
/// This does not consult the public suffix list: `www.example.co.uk` maps to
/// `co.uk`.
///
/// # Examples
///
/// ```
/// use sumi_fetch::url::extract_domain;
///
/// assert_eq!(extract_domain("http://a.b.example.com/path"), "example.com");
/// assert_eq!(extract_domain("example.com"), "example.com");
/// assert_eq!(extract_domain("localhost"), "localhost");
/// ```
pub fn extract_domain(host: &str) -> String {
    let host = host.strip_prefix(HTTP_SCHEME).unwrap_or(host);
    let host = match host.find('/') {
        Some(i) => &host[..i],
        None => host,
    };

    let Some(last_dot) = host.rfind('.') else {
        return host.to_string();
    };
    match host[..last_dot].rfind('.') {
        Some(i) => host[i + 1..].to_string(),
        None => host.to_string(),
    }
}

/// Returns the cookie-scoping domain of a parsed URL
///
/// Only the host participates, so `example.com:8080` and `example.com` share
/// cookies. URLs without a host map to the empty string.
pub fn domain_of(url: &Url) -> String {
    extract_domain(url.host_str().unwrap_or(""))
}
